//! 시장/거시/공매도 데이터 수집 CLI.
//!
//! 이 crate는 수집기 하나를 실행하고 결과 레코드를 JSON으로 출력하는 바이너리를 제공합니다:
//! - 환경변수 기반 설정 ([`CollectorConfig`])
//! - clap 명령 정의 ([`cli`])
//! - 명령 실행 ([`runner::execute`])

pub mod cli;
pub mod config;
pub mod runner;

pub use cli::{Cli, Command};
pub use config::CollectorConfig;
pub use runner::execute;
