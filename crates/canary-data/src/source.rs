//! 외부 데이터 소스 trait.
//!
//! 수집기는 네트워크 호출을 직접 하지 않고 이 trait들을 통해 데이터를 받습니다.
//! 실제 구현은 [`provider`](crate::provider) 모듈에 있으며, 테스트에서는
//! 메모리 기반 가짜 구현으로 대체합니다.

use async_trait::async_trait;
use canary_core::{Result, Series};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 가격 데이터 조회 방식.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceQuery {
    /// 최근 기간 조회 (예: period `1mo`, interval `1d`)
    Period { period: String, interval: String },
    /// 날짜 범위 조회
    Range {
        start: NaiveDate,
        end: NaiveDate,
        interval: String,
    },
}

impl PriceQuery {
    /// 조회 인터벌.
    pub fn interval(&self) -> &str {
        match self {
            PriceQuery::Period { interval, .. } | PriceQuery::Range { interval, .. } => interval,
        }
    }
}

/// 시계열 관측값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// 관측 일자
    pub date: NaiveDate,
    /// 관측값
    pub value: Decimal,
}

/// 일별 공매도 거래량.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortVolumeRecord {
    /// 거래일
    pub date: NaiveDate,
    /// 공매도 거래량 (주)
    pub volume: Decimal,
    /// 공매도 거래대금 (원)
    pub value: Decimal,
}

/// 일별 공매도 잔고.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortBalanceRecord {
    /// 공시 의무 발생일
    pub date: NaiveDate,
    /// 공매도 잔고 수량 (주)
    pub balance: Decimal,
    /// 공매도 잔고 금액 (원)
    pub balance_value: Decimal,
}

/// OHLCV 가격 데이터 소스.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// 날짜 오름차순 `{date, open, high, low, close, volume}` 시퀀스를 반환합니다.
    ///
    /// 빈 시퀀스는 해당 티커/기간에 데이터가 없다는 뜻입니다.
    async fn download(&self, ticker: &str, query: PriceQuery) -> Result<Series>;
}

/// 거시경제 시계열 소스 (FRED).
#[async_trait]
pub trait MacroSource: Send + Sync {
    /// 관측값을 날짜 오름차순으로 반환합니다. 결측값은 제외됩니다.
    async fn get_series(
        &self,
        series_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>>;
}

/// 통계 조회 주기.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatCycle {
    /// 연간 (A)
    Annual,
    /// 분기 (Q)
    Quarterly,
    /// 월간 (M)
    Monthly,
    /// 일간 (D)
    Daily,
}

/// 통계표 기반 시계열 소스 (ECOS).
#[async_trait]
pub trait StatisticsSource: Send + Sync {
    /// 통계표/항목 코드로 관측값을 조회합니다.
    async fn get_series(
        &self,
        stat_code: &str,
        item_codes: &[&str],
        cycle: StatCycle,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>>;
}

/// 미국 공매도 통계 소스.
#[async_trait]
pub trait ShortInterestSource: Send + Sync {
    /// 티커의 공매도 관련 필드를 이름-값 맵으로 반환합니다.
    async fn short_interest(&self, ticker: &str) -> Result<Map<String, Value>>;
}

/// 한국 공매도 데이터 소스.
#[async_trait]
pub trait KrShortSource: Send + Sync {
    /// 기간 내 일별 공매도 잔고.
    async fn short_balance(
        &self,
        isin: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ShortBalanceRecord>>;

    /// 기간 내 일별 공매도 거래량.
    async fn short_volume(
        &self,
        isin: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ShortVolumeRecord>>;
}

impl StatCycle {
    /// ECOS 주기 코드 (`A`, `Q`, `M`, `D`).
    pub fn code(&self) -> &'static str {
        match self {
            StatCycle::Annual => "A",
            StatCycle::Quarterly => "Q",
            StatCycle::Monthly => "M",
            StatCycle::Daily => "D",
        }
    }
}
