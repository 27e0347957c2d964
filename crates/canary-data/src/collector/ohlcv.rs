//! OHLCV 시세 수집기.

use std::sync::Arc;

use canary_core::{
    normalize_columns, CollectorError, OutputRecord, RecordType, Result, Series, TimeRange,
};
use tracing::{info, warn};

use super::{check_ticker, parse_range};
use crate::source::{PriceQuery, PriceSource};

/// 지원 인터벌.
pub const SUPPORTED_INTERVALS: [&str; 13] = [
    "1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo",
];

/// 최신 시세 조회 기간.
const LATEST_PERIOD: &str = "1mo";
/// 최신 시세 조회 인터벌.
const LATEST_INTERVAL: &str = "1d";

/// 티커별 OHLCV 수집기.
pub struct OhlcvCollector {
    source: Arc<dyn PriceSource>,
    ticker: String,
}

impl OhlcvCollector {
    /// 새로운 OHLCV 수집기 생성. 티커 앞뒤 공백은 제거합니다.
    pub fn new(source: Arc<dyn PriceSource>, ticker: impl Into<String>) -> Self {
        Self {
            source,
            ticker: ticker.into().trim().to_string(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// 지원 인터벌 목록.
    pub fn supported_intervals() -> &'static [&'static str] {
        &SUPPORTED_INTERVALS
    }

    /// 최근 1개월 일봉 중 마지막 행.
    pub async fn latest(&self) -> Result<OutputRecord> {
        self.ensure_ticker()?;

        let series = self
            .source
            .download(
                &self.ticker,
                PriceQuery::Period {
                    period: LATEST_PERIOD.to_string(),
                    interval: LATEST_INTERVAL.to_string(),
                },
            )
            .await?;

        info!(ticker = %self.ticker, rows = series.len(), "최신 OHLCV 조회");

        let record = match normalize_columns(&series).last() {
            Some(row) => OutputRecord::new(&self.ticker, row.clone()),
            None => {
                warn!(ticker = %self.ticker, "OHLCV 데이터 없음");
                OutputRecord::empty(&self.ticker)
            }
        };

        Ok(record.with_type(RecordType::Latest))
    }

    /// 기간 OHLCV 조회.
    ///
    /// `interval`이 [`SUPPORTED_INTERVALS`]에 없으면 `UnknownKey`.
    pub async fn between(&self, start: &str, end: &str, interval: &str) -> Result<OutputRecord> {
        let series = self.history(start, end, interval).await?;
        let range = TimeRange::between(start, end).with_interval(interval);

        let record = if series.is_empty() {
            warn!(ticker = %self.ticker, start, end, interval, "OHLCV 데이터 없음");
            OutputRecord::empty(&self.ticker)
        } else {
            OutputRecord::new(&self.ticker, series)
        };

        Ok(record
            .with_type(RecordType::Between)
            .with_time_range(range))
    }

    /// 기간 OHLCV 시퀀스 (지표 계산 입력용).
    pub async fn history(&self, start: &str, end: &str, interval: &str) -> Result<Series> {
        self.ensure_ticker()?;
        if !SUPPORTED_INTERVALS.contains(&interval) {
            return Err(CollectorError::UnknownKey(interval.to_string()));
        }
        let (start_date, end_date) = parse_range(start, end)?;

        let series = self
            .source
            .download(
                &self.ticker,
                PriceQuery::Range {
                    start: start_date,
                    end: end_date,
                    interval: interval.to_string(),
                },
            )
            .await?;

        info!(ticker = %self.ticker, start, end, interval, rows = series.len(), "기간 OHLCV 조회");
        Ok(normalize_columns(&series))
    }

    fn ensure_ticker(&self) -> Result<()> {
        check_ticker(&self.ticker)
    }
}
