//! tracing 구독자 설정.
//!
//! 로그는 항상 stderr로 출력합니다. stdout은 수집 결과 JSON 전용입니다.
//!
//! 형식:
//! - `pretty`: 여러 줄, 개발용
//! - `json`: 한 줄 JSON, 로그 수집기용
//! - `compact`: 한 줄 텍스트

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `RUST_LOG`가 없을 때 사용할 필터 (예: "info", "canary_data=debug")
    pub level: String,
    pub format: LogFormat,
    /// 파일명/줄 번호 출력
    pub with_file: bool,
    /// 모듈 경로 출력
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            with_file: false,
            with_target: true,
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    fn filter(&self) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&self.level))
    }

    fn stderr_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.with_file)
            .with_line_number(self.with_file)
            .with_target(self.with_target);

        match self.format {
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
        }
    }
}

/// 전역 tracing 구독자를 설치합니다.
///
/// `RUST_LOG`가 설정되어 있으면 `config.level`보다 우선합니다.
/// 이미 설치되어 있으면 에러를 반환합니다.
///
/// ```no_run
/// use canary_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = config.filter()?;

    tracing_subscriber::registry()
        .with(config.stderr_layer())
        .with(filter)
        .try_init()?;

    tracing::debug!(format = ?config.format, level = %config.level, "로깅 초기화");
    Ok(())
}
