//! 시장/거시/공매도 수집기.
//!
//! 모든 수집기는 같은 계약을 따릅니다:
//! 1. 키/티커 검증 (`UnknownKey`)
//! 2. 데이터 소스 호출
//! 3. 빈 결과면 `{"error": "empty"}` 마커를 담은 레코드 반환
//! 4. 컬럼명 정리 후 [`OutputRecord`](canary_core::OutputRecord)로 감싸기

pub mod macro_indicator;
pub mod ohlcv;
pub mod short;

use canary_core::{CollectorError, Result};
use chrono::NaiveDate;

pub use macro_indicator::{EcosSeries, KrMacroCollector, UsMacroCollector, KR_INDICATORS, US_INDICATORS};
pub use ohlcv::{OhlcvCollector, SUPPORTED_INTERVALS};
pub use short::{KrShortCollector, UsShortCollector, KR_SHORT_LOOKBACK_DAYS, US_SHORT_FIELDS};

/// `YYYY-MM-DD` 또는 `YYYYMMDD` 형식의 날짜를 파싱합니다.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
        .map_err(|_| CollectorError::InvalidParameter(format!("잘못된 날짜 형식: '{}'", raw)))
}

/// Yahoo 티커 검증.
///
/// 비어 있으면 `UnknownKey`, 영숫자와 `.^=-` 외의 문자가 있으면 `InvalidParameter`.
pub fn check_ticker(ticker: &str) -> Result<()> {
    if ticker.is_empty() {
        return Err(CollectorError::UnknownKey(ticker.to_string()));
    }

    if let Some(bad) = ticker
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-')))
    {
        return Err(CollectorError::InvalidParameter(format!(
            "티커에 허용되지 않는 문자 '{}': '{}'",
            bad, ticker
        )));
    }

    Ok(())
}

/// 시작/종료 날짜를 파싱하고 순서를 검증합니다.
pub fn parse_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate)> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;

    if start_date > end_date {
        return Err(CollectorError::InvalidParameter(format!(
            "시작일({})이 종료일({})보다 늦습니다",
            start, end
        )));
    }

    Ok((start_date, end_date))
}
