//! 공매도 수집기.
//!
//! - [`UsShortCollector`]: 미국 종목 공매도 통계 (최신 값만)
//! - [`KrShortCollector`]: 한국 종목 일별 공매도 거래량/잔고 (날짜 기준 inner join)

use std::collections::BTreeMap;
use std::sync::Arc;

use canary_core::{
    decimal_value, CollectorError, OutputRecord, RecordType, Result, Row, Series, TimeRange,
};
use chrono::{Duration, Local, NaiveDate};
use serde_json::Value;
use tracing::{info, warn};

use super::{check_ticker, parse_range};
use crate::provider::krx_short::ticker_to_isin;
use crate::source::{KrShortSource, ShortBalanceRecord, ShortInterestSource, ShortVolumeRecord};

/// 미국 공매도 레코드 필드.
pub const US_SHORT_FIELDS: [&str; 7] = [
    "sharesShort",
    "sharesShortPriorMonth",
    "shortRatio",
    "shortPercentOfFloat",
    "dateShortInterest",
    "sharesOutstanding",
    "floatShares",
];

/// 한국 공매도 최신 조회 기간 (일).
pub const KR_SHORT_LOOKBACK_DAYS: i64 = 30;

// ==================== 미국 ====================

/// 미국 종목 공매도 수집기.
pub struct UsShortCollector {
    source: Arc<dyn ShortInterestSource>,
    ticker: String,
}

impl UsShortCollector {
    /// 새로운 수집기 생성. 티커 앞뒤 공백은 제거합니다.
    pub fn new(source: Arc<dyn ShortInterestSource>, ticker: impl Into<String>) -> Self {
        Self {
            source,
            ticker: ticker.into().trim().to_string(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// 최신 공매도 통계.
    ///
    /// 고정 필드만 담으며 소스에 없는 필드는 null입니다.
    pub async fn latest(&self) -> Result<OutputRecord> {
        check_ticker(&self.ticker)?;

        let stats = self.source.short_interest(&self.ticker).await?;
        info!(ticker = %self.ticker, fields = stats.len(), "미국 공매도 통계 조회");

        let record = if stats.is_empty() {
            warn!(ticker = %self.ticker, "공매도 통계 없음");
            OutputRecord::empty(&self.ticker)
        } else {
            let row: Row = US_SHORT_FIELDS
                .iter()
                .map(|field| (*field, stats.get(*field).cloned().unwrap_or(Value::Null)))
                .collect();
            OutputRecord::new(&self.ticker, row)
        };

        Ok(record.with_type(RecordType::Latest))
    }
}

// ==================== 한국 ====================

/// 한국 종목 공매도 수집기.
pub struct KrShortCollector {
    source: Arc<dyn KrShortSource>,
    ticker: String,
    isin: String,
}

impl KrShortCollector {
    /// 새로운 수집기 생성.
    ///
    /// 6자리 KRX 단축코드가 아니면 `UnknownKey`.
    pub fn new(source: Arc<dyn KrShortSource>, ticker: impl Into<String>) -> Result<Self> {
        let ticker = ticker.into();
        let isin = ticker_to_isin(&ticker).ok_or_else(|| CollectorError::UnknownKey(ticker.clone()))?;

        Ok(Self {
            source,
            ticker,
            isin,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn isin(&self) -> &str {
        &self.isin
    }

    /// 최근 30일 중 마지막 거래일의 공매도 현황.
    pub async fn latest(&self) -> Result<OutputRecord> {
        self.latest_as_of(Local::now().date_naive()).await
    }

    /// 기준일로부터 최근 30일 중 마지막 거래일의 공매도 현황.
    pub async fn latest_as_of(&self, today: NaiveDate) -> Result<OutputRecord> {
        let start = today - Duration::days(KR_SHORT_LOOKBACK_DAYS);
        let joined = self.fetch_joined(start, today).await?;

        let record = match joined.last() {
            Some(row) => OutputRecord::new(&self.ticker, row.clone()),
            None => {
                warn!(ticker = %self.ticker, "공매도 데이터 없음");
                OutputRecord::empty(&self.ticker)
            }
        };

        Ok(record.with_type(RecordType::Latest))
    }

    /// 기간 공매도 현황 (날짜 오름차순).
    pub async fn between(&self, start: &str, end: &str) -> Result<OutputRecord> {
        let (start_date, end_date) = parse_range(start, end)?;
        let joined = self.fetch_joined(start_date, end_date).await?;

        let record = if joined.is_empty() {
            warn!(ticker = %self.ticker, start, end, "공매도 데이터 없음");
            OutputRecord::empty(&self.ticker)
        } else {
            OutputRecord::new(&self.ticker, joined)
        };

        Ok(record
            .with_type(RecordType::Between)
            .with_time_range(TimeRange::between(start, end)))
    }

    async fn fetch_joined(&self, start: NaiveDate, end: NaiveDate) -> Result<Series> {
        let balances = self.source.short_balance(&self.isin, start, end).await?;
        let volumes = self.source.short_volume(&self.isin, start, end).await?;

        info!(
            ticker = %self.ticker,
            isin = %self.isin,
            balances = balances.len(),
            volumes = volumes.len(),
            "한국 공매도 조회"
        );

        Ok(join_by_date(&balances, &volumes))
    }
}

/// 잔고와 거래량을 날짜 기준으로 inner join 합니다.
fn join_by_date(balances: &[ShortBalanceRecord], volumes: &[ShortVolumeRecord]) -> Series {
    let balance_by_date: BTreeMap<NaiveDate, &ShortBalanceRecord> =
        balances.iter().map(|b| (b.date, b)).collect();
    let volume_by_date: BTreeMap<NaiveDate, &ShortVolumeRecord> =
        volumes.iter().map(|v| (v.date, v)).collect();

    volume_by_date
        .iter()
        .filter_map(|(date, volume)| {
            balance_by_date.get(date).map(|balance| {
                Row::new()
                    .with("date", date.format("%Y-%m-%d").to_string())
                    .with("short_volume", decimal_value(Some(volume.volume)))
                    .with("short_value", decimal_value(Some(volume.value)))
                    .with("short_balance", decimal_value(Some(balance.balance)))
                    .with("short_balance_value", decimal_value(Some(balance.balance_value)))
            })
        })
        .collect()
}
