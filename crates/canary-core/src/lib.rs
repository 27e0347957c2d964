//! # Canary Core
//!
//! 시장 데이터 수집기의 공통 계약을 제공합니다:
//! - 정규화된 출력 레코드 (`OutputRecord`)
//! - 시계열 행 컨테이너 (`Row`, `Series`)
//! - OHLCV 컬럼명 정규화
//! - 지표 계산 전 최소 행 수 검증
//! - 에러 타입과 인증 정보
//! - 로깅 인프라

pub mod credentials;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod row;
pub mod validate;

pub use credentials::Credentials;
pub use error::{CollectorError, Result};
pub use normalize::{normalize_columns, OHLCV_COLUMN_MAP};
pub use output::{OutputRecord, RecordData, RecordType, TimeRange};
pub use row::{decimal_value, Row, Series};
pub use validate::validate_min_rows;
