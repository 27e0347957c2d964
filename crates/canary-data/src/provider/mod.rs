//! 외부 데이터 Provider 모듈.
//!
//! [`source`](crate::source) trait들의 실제 구현입니다.
//!
//! ## Yahoo Finance
//! - `YahooPriceSource`: OHLCV 시세 (`yahoo_finance_api`)
//! - `YahooShortSource`: 공매도 통계 (`get_ticker_info`)
//!
//! ## FRED
//! - `FredClient`: 미국 거시경제 시계열 (인증키 필요)
//!
//! ## 한국은행 ECOS
//! - `EcosClient`: 한국 거시경제 통계 (인증키 필요)
//!
//! ## KRX 정보데이터시스템
//! - `KrxShortClient`: 종목별 공매도 거래량/잔고
//! - `ticker_to_isin`: 6자리 단축코드 → ISIN 변환

pub mod ecos;
pub mod fred;
pub mod krx_short;
pub mod yahoo;
pub mod yahoo_short;

pub use ecos::{EcosClient, ECOS_BASE_URL};
pub use fred::{FredClient, FRED_BASE_URL};
pub use krx_short::{is_krx_ticker, ticker_to_isin, KrxShortClient, KRX_BASE_URL};
pub use yahoo::YahooPriceSource;
pub use yahoo_short::YahooShortSource;
