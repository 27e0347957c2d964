//! 거래량 지표: OBV, 거래량 이동평균.

use rust_decimal::Decimal;

use super::{trend, Column, IndicatorError, IndicatorResult};

/// OBV (On-Balance Volume).
///
/// 0에서 시작해 종가가 오르면 당일 거래량을 더하고, 내리면 빼고, 같으면 유지합니다.
/// 모든 행에 값이 있습니다.
pub fn obv(close: &[Decimal], volume: &[Decimal]) -> IndicatorResult<Column> {
    if close.len() != volume.len() {
        return Err(IndicatorError::InvalidParameter(format!(
            "종가와 거래량 길이가 다릅니다: {}/{}",
            close.len(),
            volume.len()
        )));
    }
    if close.is_empty() {
        return Err(IndicatorError::InsufficientData {
            required: 1,
            provided: 0,
        });
    }

    let mut running = Decimal::ZERO;
    let mut column = Vec::with_capacity(close.len());
    column.push(Some(running));

    for (pair, today_volume) in close.windows(2).zip(&volume[1..]) {
        if pair[1] > pair[0] {
            running += *today_volume;
        } else if pair[1] < pair[0] {
            running -= *today_volume;
        }
        column.push(Some(running));
    }

    Ok(column)
}

/// 거래량 단순 이동평균.
pub fn volume_ma(volume: &[Decimal], period: usize) -> IndicatorResult<Column> {
    trend::sma(volume, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn session() -> (Vec<Decimal>, Vec<Decimal>) {
        // 상승, 하락, 상승, 보합, 하락, 상승
        let close = [100, 102, 101, 103, 103, 102, 104];
        let volume = [1000, 1500, 1200, 1800, 1000, 1300, 2000];
        (
            close.into_iter().map(Decimal::from).collect(),
            volume.into_iter().map(Decimal::from).collect(),
        )
    }

    #[test]
    fn test_obv() {
        let (close, volume) = session();

        let column = obv(&close, &volume).unwrap();

        let expected = [0, 1500, 300, 2100, 2100, 800, 2800]
            .into_iter()
            .map(|v| Some(Decimal::from(v)))
            .collect::<Vec<_>>();
        assert_eq!(column, expected);
    }

    #[test]
    fn test_obv_length_mismatch() {
        let result = obv(&[dec!(100), dec!(101)], &[dec!(1000)]);
        assert!(matches!(result, Err(IndicatorError::InvalidParameter(_))));
    }

    #[test]
    fn test_obv_empty() {
        assert!(matches!(
            obv(&[], &[]),
            Err(IndicatorError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_volume_ma() {
        let (_, volume) = session();

        let column = volume_ma(&volume, 2).unwrap();

        assert!(column[0].is_none());
        assert_eq!(column[1], Some(dec!(1250)));
        assert_eq!(column[6], Some(dec!(1650)));
    }
}
