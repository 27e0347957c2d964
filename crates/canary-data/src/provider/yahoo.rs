//! Yahoo Finance 가격 데이터 소스.
//!
//! `yahoo_finance_api` 커넥터로 OHLCV 시세를 조회해 소문자 컬럼
//! (`date, open, high, low, close, volume`) 행 시퀀스로 변환합니다.

use async_trait::async_trait;
use canary_core::{CollectorError, Result, Row, Series};
use chrono::{NaiveDate, TimeZone, Utc};
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

use crate::source::{PriceQuery, PriceSource};

/// 일봉 이상 인터벌 (날짜만 표기).
const DATE_ONLY_INTERVALS: [&str; 5] = ["1d", "5d", "1wk", "1mo", "3mo"];

/// Yahoo Finance 가격 소스.
pub struct YahooPriceSource {
    connector: yahoo::YahooConnector,
}

impl YahooPriceSource {
    /// 새로운 가격 소스 생성.
    pub fn new() -> Result<Self> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            CollectorError::ConnectionFailure(format!("Yahoo Finance 연결 실패: {}", e))
        })?;
        Ok(Self { connector })
    }

    async fn fetch_quotes(&self, ticker: &str, query: &PriceQuery) -> Result<Vec<yahoo::Quote>> {
        let response = match query {
            PriceQuery::Period { period, interval } => {
                debug!(ticker, period = %period, interval = %interval, "Yahoo Finance 기간 조회");
                self.connector
                    .get_quote_range(ticker, interval, period)
                    .await
            }
            PriceQuery::Range {
                start,
                end,
                interval,
            } => {
                debug!(ticker, start = %start, end = %end, interval = %interval, "Yahoo Finance 날짜 범위 조회");
                self.connector
                    .get_quote_history_interval(
                        ticker,
                        to_offset_datetime(*start)?,
                        to_offset_datetime(*end)?,
                        interval,
                    )
                    .await
            }
        }
        .map_err(|e| {
            CollectorError::ConnectionFailure(format!("Yahoo Finance API 오류 ({}): {}", ticker, e))
        })?;

        response
            .quotes()
            .map_err(|e| CollectorError::ParseFailure(format!("Quote 파싱 오류: {}", e)))
    }
}

#[async_trait]
impl PriceSource for YahooPriceSource {
    async fn download(&self, ticker: &str, query: PriceQuery) -> Result<Series> {
        let mut quotes = self.fetch_quotes(ticker, &query).await?;
        quotes.sort_by_key(|q| q.timestamp);

        let date_only = DATE_ONLY_INTERVALS.contains(&query.interval());

        let series: Series = quotes
            .iter()
            .map(|q| {
                Row::new()
                    .with("date", format_timestamp(q.timestamp as i64, date_only))
                    .with("open", q.open)
                    .with("high", q.high)
                    .with("low", q.low)
                    .with("close", q.close)
                    .with("volume", q.volume)
            })
            .collect();

        debug!(ticker, rows = series.len(), "Yahoo Finance 시세 변환 완료");
        Ok(series)
    }
}

/// 유닉스 타임스탬프를 날짜 문자열로 변환합니다.
fn format_timestamp(timestamp: i64, date_only: bool) -> String {
    match Utc.timestamp_opt(timestamp, 0).single() {
        Some(dt) if date_only => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

/// NaiveDate를 UTC 자정의 OffsetDateTime으로 변환합니다.
fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime> {
    let timestamp = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| CollectorError::InvalidParameter(format!("잘못된 날짜: {}", date)))?;

    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| CollectorError::InvalidParameter(format!("잘못된 날짜 {}: {}", date, e)))
}
