//! 변동성 지표: 볼린저 밴드, ATR.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{check_window, Column, IndicatorError, IndicatorResult};

/// 볼린저 밴드 설정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BollingerParams {
    /// 이동평균 기간
    pub window: usize,
    /// 표준편차 배수
    pub k: Decimal,
}

/// 볼린저 밴드 컬럼 묶음.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    /// MA - k × σ
    pub lower: Column,
    /// MA
    pub middle: Column,
    /// MA + k × σ
    pub upper: Column,
    /// (상단 - 하단) / 중간 × 100
    pub bandwidth: Column,
    /// (종가 - 하단) / (상단 - 하단). 밴드 폭이 0이면 `None`.
    pub percent: Column,
}

impl BollingerBands {
    fn warmup(len: usize) -> Self {
        Self {
            lower: Vec::with_capacity(len),
            middle: Vec::with_capacity(len),
            upper: Vec::with_capacity(len),
            bandwidth: Vec::with_capacity(len),
            percent: Vec::with_capacity(len),
        }
    }

    fn push_none(&mut self) {
        self.lower.push(None);
        self.middle.push(None);
        self.upper.push(None);
        self.bandwidth.push(None);
        self.percent.push(None);
    }
}

/// 볼린저 밴드 (모집단 표준편차).
pub fn bollinger_bands(close: &[Decimal], params: BollingerParams) -> IndicatorResult<BollingerBands> {
    check_window(params.window, close.len())?;
    if params.k.is_sign_negative() {
        return Err(IndicatorError::InvalidParameter(format!(
            "표준편차 배수는 음수일 수 없습니다: {}",
            params.k
        )));
    }

    let n = Decimal::from(params.window);
    let mut bands = BollingerBands::warmup(close.len());
    for _ in 1..params.window {
        bands.push_none();
    }

    for (offset, window) in close.windows(params.window).enumerate() {
        let last = close[offset + params.window - 1];
        let mean = window.iter().sum::<Decimal>() / n;
        let variance = window
            .iter()
            .map(|value| (*value - mean) * (*value - mean))
            .sum::<Decimal>()
            / n;
        let sigma = variance.sqrt().ok_or_else(|| {
            IndicatorError::CalculationError(format!("표준편차 계산 실패: {}", variance))
        })?;

        let lower = mean - params.k * sigma;
        let upper = mean + params.k * sigma;
        let width = upper - lower;

        bands.lower.push(Some(lower));
        bands.middle.push(Some(mean));
        bands.upper.push(Some(upper));
        bands
            .bandwidth
            .push((!mean.is_zero()).then(|| width / mean * dec!(100)));
        bands
            .percent
            .push((!width.is_zero()).then(|| (last - lower) / width));
    }

    Ok(bands)
}

/// ATR (True Range의 Wilder 평활).
///
/// TR = max(고가 - 저가, |고가 - 전일 종가|, |저가 - 전일 종가|).
/// 첫 행은 전일 종가가 없으므로 고가 - 저가를 사용합니다.
/// 앞쪽 `period - 1`개는 `None`.
pub fn atr(
    high: &[Decimal],
    low: &[Decimal],
    close: &[Decimal],
    period: usize,
) -> IndicatorResult<Column> {
    if high.len() != low.len() || low.len() != close.len() {
        return Err(IndicatorError::InvalidParameter(format!(
            "고가/저가/종가 길이가 다릅니다: {}/{}/{}",
            high.len(),
            low.len(),
            close.len()
        )));
    }
    check_window(period, close.len())?;

    let true_range: Vec<Decimal> = (0..close.len())
        .map(|i| {
            let range = high[i] - low[i];
            match i.checked_sub(1).map(|prev| close[prev]) {
                Some(prev_close) => range
                    .max((high[i] - prev_close).abs())
                    .max((low[i] - prev_close).abs()),
                None => range,
            }
        })
        .collect();

    let n = Decimal::from(period);
    let mut current = true_range[..period].iter().sum::<Decimal>() / n;

    let mut column = vec![None; period - 1];
    column.push(Some(current));
    for tr in &true_range[period..] {
        current = (current * (n - Decimal::ONE) + *tr) / n;
        column.push(Some(current));
    }

    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(window: usize) -> BollingerParams {
        BollingerParams {
            window,
            k: dec!(2),
        }
    }

    #[test]
    fn test_bands_on_flat_prices() {
        let bands = bollinger_bands(&[dec!(100); 5], params(5)).unwrap();

        assert_eq!(bands.middle.len(), 5);
        assert!(bands.middle[3].is_none());
        assert_eq!(bands.middle[4], Some(dec!(100)));
        assert_eq!(bands.upper[4], Some(dec!(100)));
        assert_eq!(bands.lower[4], Some(dec!(100)));
        assert_eq!(bands.bandwidth[4], Some(Decimal::ZERO));
        // 폭이 0이면 %B 정의 안 됨
        assert_eq!(bands.percent[4], None);
    }

    #[test]
    fn test_bands_known_sigma() {
        // 평균 5, 모집단 표준편차 2
        let close: Vec<Decimal> = [2, 4, 4, 4, 5, 5, 7, 9].into_iter().map(Decimal::from).collect();

        let bands = bollinger_bands(&close, params(8)).unwrap();

        assert_eq!(bands.middle[7], Some(dec!(5)));
        assert_eq!(bands.upper[7].map(|v| v.round_dp(8)), Some(dec!(9)));
        assert_eq!(bands.lower[7].map(|v| v.round_dp(8)), Some(dec!(1)));
        // (9 - 1) / (9 - 1)
        assert_eq!(bands.percent[7].map(|v| v.round_dp(8)), Some(dec!(1)));
    }

    #[test]
    fn test_negative_k() {
        let result = bollinger_bands(
            &[dec!(1); 5],
            BollingerParams {
                window: 5,
                k: dec!(-1),
            },
        );
        assert!(matches!(result, Err(IndicatorError::InvalidParameter(_))));
    }

    #[test]
    fn test_atr_single_window() {
        let high = [dec!(11), dec!(12), dec!(13)];
        let low = [dec!(9), dec!(10), dec!(11)];
        let close = [dec!(10), dec!(11), dec!(12)];

        assert_eq!(
            atr(&high, &low, &close, 3).unwrap(),
            vec![None, None, Some(dec!(2))]
        );
    }

    #[test]
    fn test_atr_gap_from_previous_close() {
        let high = [dec!(11), dec!(21)];
        let low = [dec!(9), dec!(19)];
        let close = [dec!(10), dec!(20)];

        // 두 번째 TR = max(2, |21 - 10|, |19 - 10|)
        assert_eq!(atr(&high, &low, &close, 1).unwrap()[1], Some(dec!(11)));
    }

    #[test]
    fn test_atr_errors() {
        let short = [dec!(1); 3];
        assert!(matches!(
            atr(&short, &short, &short, 14),
            Err(IndicatorError::InsufficientData {
                required: 14,
                provided: 3
            })
        ));
        assert!(matches!(
            atr(&short, &short[..2], &short, 1),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }
}
