//! 지표 계열별 요청 파라미터와 최소 행 수 정책.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::indicators::MacdParams;

/// 추세 지표 검증 라벨.
pub const TREND_LABEL: &str = "Trend indicators (SMA/EMA)";
/// 모멘텀 지표 검증 라벨.
pub const MOMENTUM_LABEL: &str = "Momentum indicators (RSI/MACD)";
/// 변동성 지표 검증 라벨.
pub const VOLATILITY_LABEL: &str = "Volatility indicators (BBANDS/ATR)";
/// 거래량 지표 검증 라벨.
pub const VOLUME_LABEL: &str = "Volume indicators (OBV/VMA)";

/// 추세 지표 파라미터 (SMA/EMA).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendParams {
    /// SMA 기간 목록 (기본: [20, 60]).
    pub sma: Vec<usize>,
    /// EMA 기간 목록 (기본: [12, 26]).
    pub ema: Vec<usize>,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            sma: vec![20, 60],
            ema: vec![12, 26],
        }
    }
}

impl TrendParams {
    /// 설정된 모든 SMA/EMA 기간 중 최댓값.
    pub fn required_rows(&self) -> usize {
        self.sma.iter().chain(self.ema.iter()).copied().max().unwrap_or(0)
    }
}

/// 모멘텀 지표 파라미터 (RSI/MACD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumParams {
    /// RSI 기간 (기본: 14).
    pub rsi: usize,
    /// MACD 계산 여부 (기본: true).
    pub macd: bool,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self { rsi: 14, macd: true }
    }
}

impl MomentumParams {
    /// `rsi + 1`, MACD 요청 시 MACD 장기 기간(26) 이상.
    pub fn required_rows(&self) -> usize {
        let rsi_rows = self.rsi.saturating_add(1);
        if self.macd {
            rsi_rows.max(MacdParams::default().slow_period)
        } else {
            rsi_rows
        }
    }
}

/// 변동성 지표 파라미터 (볼린저 밴드/ATR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolatilityParams {
    /// 볼린저 밴드 기간 (기본: 20).
    pub bb_window: usize,
    /// 볼린저 밴드 표준편차 배수 (기본: 2.0).
    pub bb_std: Decimal,
    /// ATR 기간 (기본: 14).
    pub atr: usize,
}

impl Default for VolatilityParams {
    fn default() -> Self {
        Self {
            bb_window: 20,
            bb_std: dec!(2.0),
            atr: 14,
        }
    }
}

impl VolatilityParams {
    /// `max(bb_window, atr)`.
    pub fn required_rows(&self) -> usize {
        self.bb_window.max(self.atr)
    }
}

/// 거래량 지표 파라미터 (OBV/VMA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeParams {
    /// OBV 계산 여부 (기본: true).
    pub obv: bool,
    /// 거래량 이동평균 기간 (기본: 20).
    pub vma: usize,
}

impl Default for VolumeParams {
    fn default() -> Self {
        Self { obv: true, vma: 20 }
    }
}

impl VolumeParams {
    /// 거래량 이동평균 기간.
    pub fn required_rows(&self) -> usize {
        self.vma
    }
}
