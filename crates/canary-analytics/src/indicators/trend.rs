//! 추세 지표: SMA, EMA, MACD.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{check_window, Column, IndicatorError, IndicatorResult};

/// MACD 기간 설정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 EMA 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl MacdParams {
    /// 컬럼명 접미사 (예: "12_26_9").
    pub fn suffix(&self) -> String {
        format!(
            "{}_{}_{}",
            self.fast_period, self.slow_period, self.signal_period
        )
    }
}

/// MACD 세 개 라인. 모두 입력과 같은 길이입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    /// 단기 EMA - 장기 EMA
    pub macd: Column,
    /// MACD 라인의 EMA
    pub signal: Column,
    /// MACD - 시그널
    pub histogram: Column,
}

/// 단순 이동평균. 앞쪽 `period - 1`개는 `None`.
pub fn sma(values: &[Decimal], period: usize) -> IndicatorResult<Column> {
    check_window(period, values.len())?;

    let divisor = Decimal::from(period);
    let mut column = vec![None; period - 1];
    column.extend(
        values
            .windows(period)
            .map(|window| Some(window.iter().sum::<Decimal>() / divisor)),
    );
    Ok(column)
}

/// 지수 이동평균 (k = 2 / (period + 1)).
///
/// 첫 `period`개의 단순 평균을 시작값으로 사용합니다.
pub fn ema(values: &[Decimal], period: usize) -> IndicatorResult<Column> {
    check_window(period, values.len())?;

    let k = dec!(2) / Decimal::from(period + 1);
    let mut current = values[..period].iter().sum::<Decimal>() / Decimal::from(period);

    let mut column = vec![None; period - 1];
    column.push(Some(current));
    for value in &values[period..] {
        current += k * (*value - current);
        column.push(Some(current));
    }
    Ok(column)
}

/// MACD.
///
/// 장기 기간만큼의 입력이 있으면 계산되고, 시그널은 MACD 값이
/// 시그널 기간만큼 쌓인 뒤부터 정의됩니다.
pub fn macd(close: &[Decimal], params: MacdParams) -> IndicatorResult<MacdLines> {
    if params.fast_period == 0 || params.signal_period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "MACD 기간은 0보다 커야 합니다: {}",
            params.suffix()
        )));
    }
    check_window(params.slow_period, close.len())?;

    let fast = ema(close, params.fast_period)?;
    let slow = ema(close, params.slow_period)?;
    let macd: Column = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| (*f).zip(*s).map(|(f, s)| f - s))
        .collect();

    // 정의된 MACD 구간에만 시그널 EMA 적용
    let first = macd.iter().position(Option::is_some).unwrap_or(macd.len());
    let defined: Vec<Decimal> = macd[first..].iter().flatten().copied().collect();

    let mut signal = vec![None; first];
    if defined.len() >= params.signal_period {
        signal.extend(ema(&defined, params.signal_period)?);
    } else {
        signal.resize(macd.len(), None);
    }

    let histogram = macd
        .iter()
        .zip(&signal)
        .map(|(m, s)| (*m).zip(*s).map(|(m, s)| m - s))
        .collect();

    Ok(MacdLines {
        macd,
        signal,
        histogram,
    })
}
