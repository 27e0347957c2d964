//! 기술적 지표 계산.
//!
//! 모든 지표는 `Decimal` 입력 컬럼을 받아 같은 길이의 [`Column`]을 반환합니다.
//! 값이 정의되지 않는 앞쪽 구간(워밍업)은 `None`입니다.
//!
//! | 계열 | 지표 | 모듈 |
//! |------|------|------|
//! | 추세 | SMA, EMA, MACD | [`trend`] |
//! | 모멘텀 | RSI | [`momentum`] |
//! | 변동성 | 볼린저 밴드, ATR | [`volatility`] |
//! | 거래량 | OBV, VMA | [`volume`] |
//!
//! # 사용 예시
//!
//! ```ignore
//! use canary_analytics::indicators::IndicatorEngine;
//!
//! let engine = IndicatorEngine::new();
//! let sma = engine.sma(&close, 20)?;
//! let rsi = engine.rsi(&close, 14)?;
//! ```

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

use canary_core::CollectorError;
use rust_decimal::Decimal;
use thiserror::Error;

pub use trend::{MacdLines, MacdParams};
pub use volatility::{BollingerBands, BollingerParams};

/// 지표 값 컬럼 (워밍업 구간은 `None`).
pub type Column = Vec<Option<Decimal>>;

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 윈도우보다 입력이 짧음
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 수치 계산 실패
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

impl From<IndicatorError> for CollectorError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData { required, provided } => {
                CollectorError::InsufficientData {
                    label: "Indicator engine".to_string(),
                    required,
                    provided,
                }
            }
            IndicatorError::InvalidParameter(msg) => CollectorError::InvalidParameter(msg),
            IndicatorError::CalculationError(msg) => {
                CollectorError::InvalidParameter(format!("calculation failed: {}", msg))
            }
        }
    }
}

/// 윈도우 크기가 0이 아니고 입력이 윈도우 이상인지 확인합니다.
pub(crate) fn check_window(period: usize, available: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    if available < period {
        return Err(IndicatorError::InsufficientData {
            required: period,
            provided: available,
        });
    }
    Ok(())
}

/// 지표 계산 진입점.
///
/// 계열별 모듈의 함수를 한곳에서 호출할 수 있게 묶어 둔 얇은 래퍼입니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균.
    pub fn sma(&self, values: &[Decimal], period: usize) -> IndicatorResult<Column> {
        trend::sma(values, period)
    }

    /// 지수 이동평균 (첫 값은 SMA로 시작).
    pub fn ema(&self, values: &[Decimal], period: usize) -> IndicatorResult<Column> {
        trend::ema(values, period)
    }

    pub fn macd(&self, close: &[Decimal], params: MacdParams) -> IndicatorResult<MacdLines> {
        trend::macd(close, params)
    }

    /// RSI (0-100).
    pub fn rsi(&self, close: &[Decimal], period: usize) -> IndicatorResult<Column> {
        momentum::rsi(close, period)
    }

    pub fn bollinger_bands(
        &self,
        close: &[Decimal],
        params: BollingerParams,
    ) -> IndicatorResult<BollingerBands> {
        volatility::bollinger_bands(close, params)
    }

    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        period: usize,
    ) -> IndicatorResult<Column> {
        volatility::atr(high, low, close, period)
    }

    pub fn obv(&self, close: &[Decimal], volume: &[Decimal]) -> IndicatorResult<Column> {
        volume::obv(close, volume)
    }

    /// 거래량 이동평균.
    pub fn volume_ma(&self, volume: &[Decimal], period: usize) -> IndicatorResult<Column> {
        volume::volume_ma(volume, period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_check_window() {
        assert!(check_window(3, 3).is_ok());
        assert!(matches!(
            check_window(0, 10),
            Err(IndicatorError::InvalidParameter(_))
        ));
        assert!(matches!(
            check_window(20, 2),
            Err(IndicatorError::InsufficientData {
                required: 20,
                provided: 2
            })
        ));
    }

    #[test]
    fn test_engine_keeps_length() {
        let engine = IndicatorEngine::new();
        let close: Vec<Decimal> = (0..30).map(|i| Decimal::from(100 + i % 5)).collect();

        assert_eq!(engine.sma(&close, 5).unwrap().len(), 30);
        assert_eq!(engine.ema(&close, 5).unwrap().len(), 30);
        assert_eq!(engine.rsi(&close, 14).unwrap().len(), 30);
        assert_eq!(engine.macd(&close, MacdParams::default()).unwrap().signal.len(), 30);
        assert_eq!(engine.obv(&close, &close).unwrap().len(), 30);
    }

    #[test]
    fn test_error_conversion() {
        let err: CollectorError = IndicatorError::InvalidParameter("기간".to_string()).into();
        assert!(matches!(err, CollectorError::InvalidParameter(_)));

        let err: CollectorError = IndicatorError::InsufficientData {
            required: 3,
            provided: 1,
        }
        .into();
        assert!(err.is_insufficient_data());

        let engine = IndicatorEngine::new();
        let err: CollectorError = engine.sma(&[dec!(1), dec!(2)], 20).unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "Indicator engine requires at least 20 rows, but got 2."
        );
    }
}
