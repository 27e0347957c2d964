//! FRED (Federal Reserve Economic Data) API 클라이언트.
//!
//! `/fred/series/observations` 엔드포인트로 시계열을 조회합니다.
//! 결측값(`"."`)은 결과에서 제외됩니다.

use std::time::Duration;

use async_trait::async_trait;
use canary_core::{CollectorError, Credentials, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http::{build_client, map_reqwest_error, parse_number};
use crate::source::{MacroSource, Observation};

/// FRED API 기본 URL.
pub const FRED_BASE_URL: &str = "https://api.stlouisfed.org";

const PROVIDER: &str = "FRED";

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error_code: Option<i64>,
    error_message: String,
}

/// FRED API 클라이언트.
pub struct FredClient {
    client: reqwest::Client,
    credentials: Credentials,
    base_url: String,
}

impl FredClient {
    /// 새로운 FRED 클라이언트 생성.
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            credentials,
            base_url: FRED_BASE_URL.to_string(),
        })
    }

    /// 기본 URL 변경 (프록시/테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl MacroSource for FredClient {
    async fn get_series(
        &self,
        series_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>> {
        let url = format!("{}/fred/series/observations", self.base_url);

        let mut query = vec![
            ("series_id", series_id.to_string()),
            ("api_key", self.credentials.api_key().to_string()),
            ("file_type", "json".to_string()),
        ];
        if let Some(start) = start {
            query.push(("observation_start", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = end {
            query.push(("observation_end", end.format("%Y-%m-%d").to_string()));
        }

        debug!(series_id, url = %url, start = ?start, end = ?end, "FRED 시계열 요청");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| map_reqwest_error(PROVIDER, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(PROVIDER, e))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(error) => CollectorError::Api {
                    provider: PROVIDER.to_string(),
                    message: match error.error_code {
                        Some(code) => format!("[{}] {}", code, error.error_message),
                        None => error.error_message,
                    },
                },
                Err(_) => CollectorError::ConnectionFailure(format!(
                    "{} API 오류 [{}]: {}",
                    PROVIDER, status, body
                )),
            });
        }

        let parsed: ObservationsResponse = serde_json::from_str(&body)
            .map_err(|e| CollectorError::ParseFailure(format!("FRED 응답 파싱 실패: {}", e)))?;

        let total = parsed.observations.len();
        let mut observations = Vec::with_capacity(total);

        for raw in parsed.observations {
            let date = NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d").map_err(|e| {
                CollectorError::ParseFailure(format!("FRED 날짜 파싱 실패 '{}': {}", raw.date, e))
            })?;

            // "."은 결측값
            if raw.value.trim() == "." {
                continue;
            }
            if let Some(value) = parse_number(&raw.value) {
                observations.push(Observation { date, value });
            }
        }

        observations.sort_by_key(|o| o.date);

        if observations.len() < total {
            debug!(series_id, dropped = total - observations.len(), "FRED 결측값 제외");
        }
        if observations.is_empty() {
            warn!(series_id, "FRED 조회 결과 없음");
        }

        Ok(observations)
    }
}
