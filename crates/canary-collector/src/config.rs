//! 환경변수 기반 설정 모듈.

use std::time::Duration;

use canary_core::logging::LogFormat;
use canary_core::{CollectorError, Credentials, Result};
use canary_data::http::DEFAULT_TIMEOUT;

/// FRED 인증키 환경변수.
pub const FRED_API_KEY: &str = "FRED_API_KEY";
/// ECOS 인증키 환경변수.
pub const ECOS_API_KEY: &str = "ECOS_API_KEY";

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// FRED 인증키 (미국 거시 지표 수집 시 필수)
    pub fred_api_key: Option<String>,
    /// ECOS 인증키 (한국 거시 지표 수집 시 필수)
    pub ecos_api_key: Option<String>,
    /// HTTP 설정
    pub http: HttpConfig,
    /// 엔드포인트 재정의
    pub endpoints: EndpointConfig,
    /// 로그 출력 형식
    pub log_format: LogFormat,
}

/// HTTP 설정
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

/// 데이터 소스 기본 URL 재정의 (프록시/테스트용).
#[derive(Debug, Clone, Default)]
pub struct EndpointConfig {
    pub fred_base_url: Option<String>,
    pub ecos_base_url: Option<String>,
    pub krx_base_url: Option<String>,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 로드.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match non_empty(&lookup, "LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(CollectorError::InvalidParameter)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            fred_api_key: non_empty(&lookup, FRED_API_KEY),
            ecos_api_key: non_empty(&lookup, ECOS_API_KEY),
            http: HttpConfig {
                timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs()),
            },
            endpoints: EndpointConfig {
                fred_base_url: non_empty(&lookup, "FRED_BASE_URL"),
                ecos_base_url: non_empty(&lookup, "ECOS_BASE_URL"),
                krx_base_url: non_empty(&lookup, "KRX_BASE_URL"),
            },
            log_format,
        })
    }

    /// FRED 인증 정보. 키가 없으면 `MissingCredential`.
    pub fn fred_credentials(&self) -> Result<Credentials> {
        credentials(FRED_API_KEY, self.fred_api_key.as_deref())
    }

    /// ECOS 인증 정보. 키가 없으면 `MissingCredential`.
    pub fn ecos_credentials(&self) -> Result<Credentials> {
        credentials(ECOS_API_KEY, self.ecos_api_key.as_deref())
    }
}

impl HttpConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

fn credentials(name: &str, key: Option<&str>) -> Result<Credentials> {
    match key {
        Some(key) => Credentials::new(name, key),
        None => Err(CollectorError::MissingCredential(name.to_string())),
    }
}

/// 값이 비어 있으면 None
fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 값을 파싱 (실패 시 기본값 사용)
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    non_empty(lookup, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<CollectorConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CollectorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert!(config.fred_api_key.is_none());
        assert!(config.ecos_api_key.is_none());
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert!(config.endpoints.fred_base_url.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FRED_API_KEY", "fred-key"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("KRX_BASE_URL", "http://127.0.0.1:8080"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.fred_api_key.as_deref(), Some("fred-key"));
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(
            config.endpoints.krx_base_url.as_deref(),
            Some("http://127.0.0.1:8080")
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let config = load(&[("HTTP_TIMEOUT_SECS", "soon")]).unwrap();
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_log_format() {
        let err = load(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, CollectorError::InvalidParameter(_)));
    }

    #[test]
    fn test_missing_credentials() {
        let config = load(&[("ECOS_API_KEY", "   ")]).unwrap();

        let err = config.fred_credentials().unwrap_err();
        assert_eq!(err.to_string(), "FRED_API_KEY is not set");
        assert!(matches!(
            config.ecos_credentials(),
            Err(CollectorError::MissingCredential(ref name)) if name == "ECOS_API_KEY"
        ));
    }

    #[test]
    fn test_credentials_present() {
        let config = load(&[("FRED_API_KEY", "abc")]).unwrap();
        assert_eq!(config.fred_credentials().unwrap().api_key(), "abc");
    }
}
