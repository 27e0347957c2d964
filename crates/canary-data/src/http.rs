//! HTTP 클라이언트 공통 처리.

use std::time::Duration;

use canary_core::{CollectorError, Result};

/// 기본 요청 타임아웃.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 타임아웃이 설정된 reqwest 클라이언트를 생성합니다.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent("Mozilla/5.0 (compatible; canary-collector)")
        .build()
        .map_err(|e| CollectorError::ConnectionFailure(format!("HTTP 클라이언트 생성 실패: {}", e)))
}

/// reqwest 에러를 수집기 에러로 변환합니다.
///
/// 응답 본문 디코딩 실패는 `ParseFailure`, 나머지는 `ConnectionFailure`.
pub fn map_reqwest_error(provider: &str, err: reqwest::Error) -> CollectorError {
    if err.is_decode() {
        CollectorError::ParseFailure(format!("{} 응답 파싱 실패: {}", provider, err))
    } else {
        CollectorError::ConnectionFailure(format!("{} 요청 실패: {}", provider, err))
    }
}

/// 성공 상태가 아니면 본문을 포함한 `ConnectionFailure`로 변환합니다.
pub async fn ensure_success(provider: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CollectorError::ConnectionFailure(format!(
        "{} API 오류 [{}]: {}",
        provider, status, body
    )))
}

/// 응답 본문을 JSON으로 읽습니다.
pub async fn read_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    response: reqwest::Response,
) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| map_reqwest_error(provider, e))?;

    serde_json::from_str(&body)
        .map_err(|e| CollectorError::ParseFailure(format!("{} 응답 파싱 실패: {}", provider, e)))
}

/// 쉼표가 포함된 숫자 문자열을 파싱합니다 (`"1,234"` → 1234).
pub fn parse_number(raw: &str) -> Option<rust_decimal::Decimal> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse().ok()
}
