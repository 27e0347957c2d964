//! 거시경제 지표 수집기.
//!
//! - [`UsMacroCollector`]: FRED 시계열 (CPI, GDP, 금리, VIX 등)
//! - [`KrMacroCollector`]: 한국은행 ECOS 통계 (기준금리, CPI, 환율 등)
//!
//! 키는 대소문자를 구분하지 않으며, 결과 행은 `{date, <key>: value}` 형태입니다.

use std::sync::Arc;

use canary_core::{
    decimal_value, CollectorError, OutputRecord, RecordType, Result, Row, Series, TimeRange,
};
use chrono::NaiveDate;
use tracing::{info, warn};

use super::parse_range;
use crate::source::{MacroSource, Observation, StatCycle, StatisticsSource};

/// 미국 거시 지표 키 → FRED 시리즈 ID.
pub const US_INDICATORS: [(&str, &str); 12] = [
    ("cpi", "CPIAUCSL"),
    ("core_cpi", "CPILFESL"),
    ("core_pce", "PCEPILFE"),
    ("gdp", "GDPC1"),
    ("industrial_production", "INDPRO"),
    ("unemployment_rate", "UNRATE"),
    ("nonfarm_payrolls", "PAYEMS"),
    ("federal_funds_rate", "FEDFUNDS"),
    ("10_year_bonds", "DGS10"),
    ("2_year_bonds", "DGS2"),
    ("vix", "VIXCLS"),
    ("nfci", "NFCI"),
];

/// ECOS 통계 시리즈 정의.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcosSeries {
    /// 통계표 코드
    pub stat_code: &'static str,
    /// 통계항목 코드
    pub item_code: &'static str,
    /// 조회 주기
    pub cycle: StatCycle,
}

/// 한국 거시 지표 키 → ECOS 시리즈.
pub const KR_INDICATORS: [(&str, EcosSeries); 6] = [
    (
        "base_rate",
        EcosSeries {
            stat_code: "722Y001",
            item_code: "0101000",
            cycle: StatCycle::Monthly,
        },
    ),
    (
        "cpi",
        EcosSeries {
            stat_code: "901Y009",
            item_code: "0",
            cycle: StatCycle::Monthly,
        },
    ),
    (
        "usd_krw",
        EcosSeries {
            stat_code: "731Y001",
            item_code: "0000001",
            cycle: StatCycle::Daily,
        },
    ),
    (
        "gdp_growth",
        EcosSeries {
            stat_code: "200Y002",
            item_code: "10111",
            cycle: StatCycle::Quarterly,
        },
    ),
    (
        "unemployment_rate",
        EcosSeries {
            stat_code: "901Y027",
            item_code: "I61BC",
            cycle: StatCycle::Monthly,
        },
    ),
    (
        "m2",
        EcosSeries {
            stat_code: "101Y003",
            item_code: "BBHS00",
            cycle: StatCycle::Monthly,
        },
    ),
];

/// 키 테이블에서 대소문자 구분 없이 항목을 찾습니다.
fn lookup<T: Copy>(table: &[(&'static str, T)], key: &str) -> Result<(&'static str, T)> {
    let normalized = key.trim().to_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == normalized)
        .copied()
        .ok_or(CollectorError::UnknownKey(normalized))
}

/// 관측값을 `{date, <key>: value}` 행 시퀀스로 변환합니다.
fn to_series(key: &str, observations: &[Observation]) -> Series {
    observations
        .iter()
        .map(|o| {
            Row::new()
                .with("date", o.date.format("%Y-%m-%d").to_string())
                .with(key, decimal_value(Some(o.value)))
        })
        .collect()
}

fn latest_record(key: &str, observations: &[Observation]) -> OutputRecord {
    let record = match to_series(key, observations).last() {
        Some(row) => OutputRecord::new(key, row.clone()),
        None => {
            warn!(key, "거시 지표 데이터 없음");
            OutputRecord::empty(key)
        }
    };
    record.with_type(RecordType::Latest)
}

fn between_record(key: &str, observations: &[Observation], start: &str, end: &str) -> OutputRecord {
    let record = if observations.is_empty() {
        warn!(key, start, end, "거시 지표 데이터 없음");
        OutputRecord::empty(key)
    } else {
        OutputRecord::new(key, to_series(key, observations))
    };
    record
        .with_type(RecordType::Between)
        .with_time_range(TimeRange::between(start, end))
}

// ==================== 미국 (FRED) ====================

/// 미국 거시경제 지표 수집기.
pub struct UsMacroCollector {
    source: Arc<dyn MacroSource>,
}

impl UsMacroCollector {
    /// 새로운 수집기 생성.
    pub fn new(source: Arc<dyn MacroSource>) -> Self {
        Self { source }
    }

    /// 지원 키 목록.
    pub fn keys() -> Vec<&'static str> {
        US_INDICATORS.iter().map(|(key, _)| *key).collect()
    }

    /// 조회 가능한 키인지 확인합니다 (대소문자 무시).
    pub fn can_search(key: &str) -> bool {
        lookup(&US_INDICATORS, key).is_ok()
    }

    /// 가장 최근 관측값.
    pub async fn latest(&self, key: &str) -> Result<OutputRecord> {
        let (key, series_id) = lookup(&US_INDICATORS, key)?;
        let observations = self.fetch(key, series_id, None, None).await?;
        Ok(latest_record(key, &observations))
    }

    /// 기간 관측값.
    pub async fn between(&self, key: &str, start: &str, end: &str) -> Result<OutputRecord> {
        let (key, series_id) = lookup(&US_INDICATORS, key)?;
        let (start_date, end_date) = parse_range(start, end)?;
        let observations = self
            .fetch(key, series_id, Some(start_date), Some(end_date))
            .await?;
        Ok(between_record(key, &observations, start, end))
    }

    async fn fetch(
        &self,
        key: &str,
        series_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>> {
        let observations = self.source.get_series(series_id, start, end).await?;
        info!(key, series_id, count = observations.len(), "미국 거시 지표 조회");
        Ok(observations)
    }
}

// ==================== 한국 (ECOS) ====================

/// 한국 거시경제 지표 수집기.
pub struct KrMacroCollector {
    source: Arc<dyn StatisticsSource>,
}

impl KrMacroCollector {
    /// 새로운 수집기 생성.
    pub fn new(source: Arc<dyn StatisticsSource>) -> Self {
        Self { source }
    }

    /// 지원 키 목록.
    pub fn keys() -> Vec<&'static str> {
        KR_INDICATORS.iter().map(|(key, _)| *key).collect()
    }

    /// 조회 가능한 키인지 확인합니다 (대소문자 무시).
    pub fn can_search(key: &str) -> bool {
        lookup(&KR_INDICATORS, key).is_ok()
    }

    /// 가장 최근 관측값.
    pub async fn latest(&self, key: &str) -> Result<OutputRecord> {
        let (key, series) = lookup(&KR_INDICATORS, key)?;
        let observations = self.fetch(key, series, None, None).await?;
        Ok(latest_record(key, &observations))
    }

    /// 기간 관측값.
    pub async fn between(&self, key: &str, start: &str, end: &str) -> Result<OutputRecord> {
        let (key, series) = lookup(&KR_INDICATORS, key)?;
        let (start_date, end_date) = parse_range(start, end)?;
        let observations = self
            .fetch(key, series, Some(start_date), Some(end_date))
            .await?;
        Ok(between_record(key, &observations, start, end))
    }

    async fn fetch(
        &self,
        key: &str,
        series: EcosSeries,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>> {
        let observations = self
            .source
            .get_series(series.stat_code, &[series.item_code], series.cycle, start, end)
            .await?;
        info!(
            key,
            stat_code = series.stat_code,
            count = observations.len(),
            "한국 거시 지표 조회"
        );
        Ok(observations)
    }
}
