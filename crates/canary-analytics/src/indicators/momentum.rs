//! 모멘텀 지표: RSI.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{Column, IndicatorError, IndicatorResult};

/// RSI (Wilder 평활).
///
/// RSI = 100 - 100 / (1 + 평균 상승폭 / 평균 하락폭)
///
/// 변화량이 `period`개 필요하므로 입력은 `period + 1`개 이상이어야 합니다.
/// 첫 평균은 변화량의 단순 평균이고, 이후 `(이전 × (n - 1) + 현재) / n`으로 갱신합니다.
/// 앞쪽 `period`개는 `None`.
pub fn rsi(close: &[Decimal], period: usize) -> IndicatorResult<Column> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    let required = period.saturating_add(1);
    if close.len() < required {
        return Err(IndicatorError::InsufficientData {
            required,
            provided: close.len(),
        });
    }

    let deltas: Vec<Decimal> = close.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let n = Decimal::from(period);

    let (gain_sum, loss_sum) = deltas[..period]
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(gain, loss), delta| {
            (gain + up(*delta), loss + down(*delta))
        });
    let mut avg_gain = gain_sum / n;
    let mut avg_loss = loss_sum / n;

    let mut column = vec![None; period];
    column.push(Some(strength(avg_gain, avg_loss)));

    for delta in &deltas[period..] {
        avg_gain = (avg_gain * (n - Decimal::ONE) + up(*delta)) / n;
        avg_loss = (avg_loss * (n - Decimal::ONE) + down(*delta)) / n;
        column.push(Some(strength(avg_gain, avg_loss)));
    }

    Ok(column)
}

fn up(delta: Decimal) -> Decimal {
    delta.max(Decimal::ZERO)
}

fn down(delta: Decimal) -> Decimal {
    (-delta).max(Decimal::ZERO)
}

fn strength(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
    match (avg_gain.is_zero(), avg_loss.is_zero()) {
        // 변화 없음
        (true, true) => dec!(50),
        (false, true) => dec!(100),
        _ => dec!(100) - dec!(100) / (Decimal::ONE + avg_gain / avg_loss),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Vec<Decimal> {
        [100, 102, 101, 103, 105, 104, 106, 108, 107, 109, 111, 110, 112, 114, 113]
            .into_iter()
            .map(Decimal::from)
            .collect()
    }

    #[test]
    fn test_first_value_at_period_plus_one() {
        let column = rsi(&zigzag(), 14).unwrap();

        assert_eq!(column.len(), 15);
        assert!(column[13].is_none());
        let value = column[14].unwrap();
        assert!(value > dec!(50) && value <= dec!(100));
    }

    #[test]
    fn test_bounded() {
        let close: Vec<Decimal> = (0..40).map(|i| Decimal::from(100 + (i * 7) % 11)).collect();

        for value in rsi(&close, 5).unwrap().iter().flatten() {
            assert!(*value >= Decimal::ZERO && *value <= dec!(100));
        }
    }

    #[test]
    fn test_only_gains() {
        let close: Vec<Decimal> = (0..10).map(Decimal::from).collect();
        assert_eq!(rsi(&close, 3).unwrap()[9], Some(dec!(100)));
    }

    #[test]
    fn test_only_losses() {
        let close: Vec<Decimal> = (0..10).rev().map(Decimal::from).collect();
        assert_eq!(rsi(&close, 3).unwrap()[9], Some(Decimal::ZERO));
    }

    #[test]
    fn test_flat() {
        assert_eq!(rsi(&[dec!(10); 6], 3).unwrap()[5], Some(dec!(50)));
    }

    #[test]
    fn test_huge_period() {
        assert!(matches!(
            rsi(&zigzag(), usize::MAX),
            Err(IndicatorError::InsufficientData {
                required: usize::MAX,
                provided: 15
            })
        ));
    }

    #[test]
    fn test_insufficient() {
        assert!(matches!(
            rsi(&zigzag()[..14], 14),
            Err(IndicatorError::InsufficientData {
                required: 15,
                provided: 14
            })
        ));
    }
}
