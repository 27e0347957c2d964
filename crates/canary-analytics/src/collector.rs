//! 기술적 지표 수집기.
//!
//! OHLCV 시퀀스를 받아 컬럼명을 정규화하고, 계열별 최소 행 수를 검증한 뒤
//! [`IndicatorEngine`]으로 지표를 계산해 원본 컬럼 뒤에 덧붙입니다.
//! 검증에 실패하면 부분 결과 없이 즉시 에러를 반환합니다.

use canary_core::{
    normalize_columns, validate_min_rows, OutputRecord, RecordType, Result, Series, TimeRange,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::indicators::{BollingerParams, IndicatorEngine, MacdParams};
use crate::params::{
    MomentumParams, TrendParams, VolatilityParams, VolumeParams, MOMENTUM_LABEL, TREND_LABEL,
    VOLATILITY_LABEL, VOLUME_LABEL,
};

/// 기술적 지표 수집기.
///
/// 계산에 쓰는 컬럼(`close`, `high`, `low`, `volume`)은 모든 행이 숫자여야 합니다.
/// null이나 숫자가 아닌 값이 하나라도 있으면 해당 계열 전체가 `ParseFailure`로 실패합니다.
#[derive(Debug, Default)]
pub struct TechIndicatorCollector {
    engine: IndicatorEngine,
}

impl TechIndicatorCollector {
    /// 새로운 수집기 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 추세 지표 (SMA/EMA).
    ///
    /// 기간별로 `SMA_{w}`, `EMA_{w}` 컬럼을 추가합니다. 같은 기간이 중복되면 한 번만 계산합니다.
    pub fn trend(
        &self,
        ticker: &str,
        series: &Series,
        params: &TrendParams,
        range: TimeRange,
    ) -> Result<OutputRecord> {
        let mut frame = normalize_columns(series);
        validate_min_rows(frame.len(), params.required_rows(), TREND_LABEL)?;

        if !params.sma.is_empty() || !params.ema.is_empty() {
            let close = frame.decimal_column("close")?;

            for period in unique(&params.sma) {
                let values = self.engine.sma(&close, period)?;
                frame.append_column(&format!("SMA_{}", period), values)?;
            }

            for period in unique(&params.ema) {
                let values = self.engine.ema(&close, period)?;
                frame.append_column(&format!("EMA_{}", period), values)?;
            }
        }

        debug!(
            ticker,
            rows = frame.len(),
            sma = ?params.sma,
            ema = ?params.ema,
            "추세 지표 계산 완료"
        );

        Ok(wrap(ticker, frame, RecordType::Trend, range))
    }

    /// 모멘텀 지표 (RSI, 선택적으로 MACD).
    pub fn momentum(
        &self,
        ticker: &str,
        series: &Series,
        params: &MomentumParams,
        range: TimeRange,
    ) -> Result<OutputRecord> {
        let mut frame = normalize_columns(series);
        validate_min_rows(frame.len(), params.required_rows(), MOMENTUM_LABEL)?;

        let close = frame.decimal_column("close")?;

        let rsi = self.engine.rsi(&close, params.rsi)?;
        frame.append_column(&format!("RSI_{}", params.rsi), rsi)?;

        if params.macd {
            let macd_params = MacdParams::default();
            let suffix = macd_params.suffix();
            let lines = self.engine.macd(&close, macd_params)?;

            frame.append_column(&format!("MACD_{}", suffix), lines.macd)?;
            frame.append_column(&format!("MACDh_{}", suffix), lines.histogram)?;
            frame.append_column(&format!("MACDs_{}", suffix), lines.signal)?;
        }

        debug!(
            ticker,
            rows = frame.len(),
            rsi = params.rsi,
            macd = params.macd,
            "모멘텀 지표 계산 완료"
        );

        Ok(wrap(ticker, frame, RecordType::Momentum, range))
    }

    /// 변동성 지표 (볼린저 밴드, ATR).
    pub fn volatility(
        &self,
        ticker: &str,
        series: &Series,
        params: &VolatilityParams,
        range: TimeRange,
    ) -> Result<OutputRecord> {
        let mut frame = normalize_columns(series);
        validate_min_rows(frame.len(), params.required_rows(), VOLATILITY_LABEL)?;

        let high = frame.decimal_column("high")?;
        let low = frame.decimal_column("low")?;
        let close = frame.decimal_column("close")?;

        let bands = self.engine.bollinger_bands(
            &close,
            BollingerParams {
                window: params.bb_window,
                k: params.bb_std,
            },
        )?;
        let suffix = format!("{}_{}", params.bb_window, format_std(params.bb_std));

        frame.append_column(&format!("BBL_{}", suffix), bands.lower)?;
        frame.append_column(&format!("BBM_{}", suffix), bands.middle)?;
        frame.append_column(&format!("BBU_{}", suffix), bands.upper)?;
        frame.append_column(&format!("BBB_{}", suffix), bands.bandwidth)?;
        frame.append_column(&format!("BBP_{}", suffix), bands.percent)?;

        let atr = self.engine.atr(&high, &low, &close, params.atr)?;
        frame.append_column(&format!("ATRr_{}", params.atr), atr)?;

        debug!(
            ticker,
            rows = frame.len(),
            bb_window = params.bb_window,
            bb_std = %params.bb_std,
            atr = params.atr,
            "변동성 지표 계산 완료"
        );

        Ok(wrap(ticker, frame, RecordType::Volatility, range))
    }

    /// 거래량 지표 (선택적으로 OBV, 거래량 이동평균).
    pub fn volume(
        &self,
        ticker: &str,
        series: &Series,
        params: &VolumeParams,
        range: TimeRange,
    ) -> Result<OutputRecord> {
        let mut frame = normalize_columns(series);
        validate_min_rows(frame.len(), params.required_rows(), VOLUME_LABEL)?;

        let volume = frame.decimal_column("volume")?;

        if params.obv {
            let close = frame.decimal_column("close")?;
            let obv = self.engine.obv(&close, &volume)?;
            frame.append_column("OBV", obv)?;
        }

        let vma = self.engine.volume_ma(&volume, params.vma)?;
        frame.append_column(&format!("VMA_{}", params.vma), vma)?;

        debug!(
            ticker,
            rows = frame.len(),
            obv = params.obv,
            vma = params.vma,
            "거래량 지표 계산 완료"
        );

        Ok(wrap(ticker, frame, RecordType::Volume, range))
    }
}

fn wrap(ticker: &str, frame: Series, kind: RecordType, range: TimeRange) -> OutputRecord {
    OutputRecord::new(ticker, frame)
        .with_type(kind)
        .with_time_range(range)
}

/// 입력 순서를 유지한 채 중복 기간을 제거합니다.
fn unique(periods: &[usize]) -> Vec<usize> {
    let mut seen = Vec::with_capacity(periods.len());
    for &period in periods {
        if !seen.contains(&period) {
            seen.push(period);
        }
    }
    seen
}

/// 표준편차 배수를 컬럼명용 문자열로 변환합니다 (`2` → `"2.0"`, `2.50` → `"2.5"`).
fn format_std(value: Decimal) -> String {
    let normalized = value.normalize();
    if normalized.scale() == 0 {
        format!("{}.0", normalized)
    } else {
        normalized.to_string()
    }
}
