//! OHLCV 컬럼명 정규화.
//!
//! 가격 데이터 소스마다 `Open`/`open`처럼 표기가 달라서, 지표 계산 전에
//! 소문자 컬럼명으로 통일합니다.

use crate::row::Series;

/// 정규화 대상 컬럼 매핑.
pub const OHLCV_COLUMN_MAP: [(&str, &str); 5] = [
    ("Open", "open"),
    ("High", "high"),
    ("Low", "low"),
    ("Close", "close"),
    ("Volume", "volume"),
];

/// `Open/High/Low/Close/Volume`을 소문자로 바꾼 사본을 반환합니다.
///
/// 다른 컬럼은 건드리지 않으며 입력 시퀀스는 변경되지 않습니다.
pub fn normalize_columns(series: &Series) -> Series {
    series.renamed(&OHLCV_COLUMN_MAP)
}
