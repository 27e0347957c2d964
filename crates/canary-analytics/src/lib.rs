//! 기술적 지표 계산 및 수집.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 엔진 (SMA, EMA, MACD, RSI, 볼린저 밴드, ATR, OBV, VMA)
//! - 지표 계열별 파라미터와 최소 행 수 정책
//! - OHLCV 시퀀스에 지표 컬럼을 덧붙여 [`OutputRecord`](canary_core::OutputRecord)로
//!   감싸는 [`TechIndicatorCollector`]
//!
//! # 사용 예시
//!
//! ```ignore
//! use canary_analytics::{TechIndicatorCollector, TrendParams};
//! use canary_core::TimeRange;
//!
//! let collector = TechIndicatorCollector::new();
//! let record = collector.trend("AAPL", &series, &TrendParams::default(), TimeRange::default())?;
//! ```

pub mod collector;
pub mod indicators;
pub mod params;

pub use collector::TechIndicatorCollector;
pub use indicators::{IndicatorEngine, IndicatorError, IndicatorResult};
pub use params::{
    MomentumParams, TrendParams, VolatilityParams, VolumeParams, MOMENTUM_LABEL, TREND_LABEL,
    VOLATILITY_LABEL, VOLUME_LABEL,
};
