//! Yahoo Finance 공매도 통계 소스.
//!
//! `yahoo_finance_api`의 `get_ticker_info`로 quoteSummary를 조회하고
//! `defaultKeyStatistics`의 공매도 관련 값만 평면 맵으로 꺼냅니다.
//! crumb 토큰 인증은 크레이트가 처리합니다.

use async_trait::async_trait;
use canary_core::{CollectorError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;
use yahoo_finance_api as yahoo;

use crate::source::ShortInterestSource;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance 공매도 소스.
pub struct YahooShortSource {
    // get_ticker_info는 &mut self
    connector: Mutex<yahoo::YahooConnector>,
}

impl YahooShortSource {
    /// 새로운 공매도 소스 생성.
    pub fn new() -> Result<Self> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            CollectorError::ConnectionFailure(format!("Yahoo Finance 연결 실패: {}", e))
        })?;
        Ok(Self {
            connector: Mutex::new(connector),
        })
    }
}

#[async_trait]
impl ShortInterestSource for YahooShortSource {
    async fn short_interest(&self, ticker: &str) -> Result<Map<String, Value>> {
        debug!(ticker, "Yahoo ticker info 조회");

        let summary = {
            let mut connector = self.connector.lock().await;
            connector.get_ticker_info(ticker).await.map_err(|e| {
                CollectorError::ConnectionFailure(format!(
                    "Yahoo ticker info 조회 실패 ({}): {}",
                    ticker, e
                ))
            })?
        };

        let quote_summary = summary.quote_summary.ok_or_else(|| CollectorError::Api {
            provider: PROVIDER.to_string(),
            message: format!("ticker info 결과 없음: {}", ticker),
        })?;

        let Some(stats) = quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .and_then(|data| data.default_key_statistics)
        else {
            return Ok(Map::new());
        };

        Ok(present_fields([
            ("sharesShort", stats.shares_short.map(number)),
            (
                "sharesShortPriorMonth",
                stats.shares_short_prior_month.map(number),
            ),
            ("shortRatio", stats.short_ratio.map(number)),
            (
                "shortPercentOfFloat",
                stats.short_percent_of_float.map(number),
            ),
            ("dateShortInterest", stats.date_short_interest.map(number)),
            ("sharesOutstanding", stats.shares_outstanding.map(number)),
            ("floatShares", stats.float_shares.map(number)),
        ]))
    }
}

/// 숫자 필드를 JSON 값으로. 표현할 수 없는 값(NaN 등)은 null.
fn number<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// 값이 있는 필드만 남깁니다. 모두 비어 있으면 빈 맵.
fn present_fields<const N: usize>(fields: [(&str, Option<Value>); N]) -> Map<String, Value> {
    fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
}
