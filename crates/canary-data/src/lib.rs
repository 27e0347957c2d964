//! 시장/거시/공매도 데이터 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - 외부 데이터 소스 trait ([`source`])
//! - Yahoo Finance, FRED, ECOS, KRX 클라이언트 ([`provider`])
//! - OHLCV, 거시 지표, 공매도 수집기 ([`collector`])
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use canary_data::{FredClient, UsMacroCollector};
//! use canary_core::Credentials;
//!
//! let fred = FredClient::new(Credentials::from_env("FRED_API_KEY")?, timeout)?;
//! let collector = UsMacroCollector::new(Arc::new(fred));
//! let record = collector.latest("cpi").await?;
//! ```

pub mod collector;
pub mod http;
pub mod provider;
pub mod source;

// 수집기 재내보내기
pub use collector::{
    parse_date, parse_range, EcosSeries, KrMacroCollector, KrShortCollector, OhlcvCollector,
    UsMacroCollector, UsShortCollector, KR_INDICATORS, SUPPORTED_INTERVALS, US_INDICATORS,
    US_SHORT_FIELDS,
};

// Provider 재내보내기
pub use provider::{
    ticker_to_isin, EcosClient, FredClient, KrxShortClient, YahooPriceSource, YahooShortSource,
};

// 데이터 소스 trait 재내보내기
pub use source::{
    KrShortSource, MacroSource, Observation, PriceQuery, PriceSource, ShortBalanceRecord,
    ShortInterestSource, ShortVolumeRecord, StatCycle, StatisticsSource,
};
