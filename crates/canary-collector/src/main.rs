//! 데이터 수집 CLI.
//!
//! 결과 JSON은 stdout, 로그는 stderr로 출력합니다.

use anyhow::Context;
use canary_collector::{execute, Cli, CollectorConfig};
use canary_core::logging::{init_logging, LogConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 설정 로드
    let config = CollectorConfig::from_env().context("설정 로드 실패")?;

    // 로깅 초기화
    init_logging(LogConfig::new(cli.log_level.as_str()).with_format(config.log_format))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    tracing::debug!(
        timeout_secs = config.http.timeout_secs,
        fred_key = config.fred_api_key.is_some(),
        ecos_key = config.ecos_api_key.is_some(),
        "설정 로드 완료"
    );

    let value = match execute(cli.command, &config).await {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "수집 실패");
            return Err(e.into());
        }
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{}", output);

    Ok(())
}
