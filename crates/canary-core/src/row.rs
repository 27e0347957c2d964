//! 시계열 행(Row)과 행 시퀀스(Series).
//!
//! `Row`는 컬럼명 → 스칼라 값의 순서 보존 매핑이고, `Series`는 날짜 오름차순으로
//! 정렬된 `Row`의 시퀀스입니다. 정규화, 검증, 지표 계산은 모두 이 컨테이너 위에서
//! 동작하며 특정 테이블 라이브러리에 의존하지 않습니다.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CollectorError, Result};

/// 빈 결과 마커의 키.
pub const EMPTY_MARKER_KEY: &str = "error";
/// 빈 결과 마커의 값.
pub const EMPTY_MARKER_VALUE: &str = "empty";

/// 시계열의 한 시점.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    /// 빈 행 생성.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// `{"error": "empty"}` 마커 행.
    pub fn empty_marker() -> Self {
        Self::new().with(EMPTY_MARKER_KEY, EMPTY_MARKER_VALUE)
    }

    /// 빈 결과 마커인지 확인합니다.
    pub fn is_empty_marker(&self) -> bool {
        self.0.len() == 1
            && self.0.get(EMPTY_MARKER_KEY).and_then(Value::as_str) == Some(EMPTY_MARKER_VALUE)
    }

    /// 컬럼을 추가한 행을 반환합니다 (빌더 형태).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// 컬럼 값을 설정하고 이전 값을 반환합니다.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(column.into(), value.into())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 삽입 순서대로 컬럼명 순회.
    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// 컬럼 값을 Decimal로 읽습니다.
    ///
    /// 숫자 또는 숫자 문자열(천 단위 쉼표 허용)만 변환되며 `null`은 `None`입니다.
    pub fn decimal(&self, column: &str) -> Option<Decimal> {
        self.0.get(column).and_then(value_to_decimal)
    }

    /// 컬럼명을 바꾼 새 행을 반환합니다.
    ///
    /// 컬럼 위치는 유지됩니다. 대상 이름이 이미 존재하면 원래 컬럼은 그대로 둡니다.
    pub fn renamed(&self, mapping: &[(&str, &str)]) -> Row {
        let mut out = Map::with_capacity(self.0.len());

        for (column, value) in &self.0 {
            let target = mapping
                .iter()
                .find(|(from, _)| *from == column.as_str())
                .map(|(_, to)| *to)
                .filter(|to| !self.0.contains_key(*to));

            match target {
                Some(to) => out.insert(to.to_string(), value.clone()),
                None => out.insert(column.clone(), value.clone()),
            };
        }

        Row(out)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Decimal을 JSON 값으로 변환합니다 (정의되지 않은 값은 `null`).
pub fn decimal_value(value: Option<Decimal>) -> Value {
    value
        .and_then(|d| d.normalize().to_f64())
        .map(Value::from)
        .unwrap_or(Value::Null)
}

fn value_to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) => parse_decimal_str(&s.replace(',', "")),
        _ => None,
    }
}

fn parse_decimal_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// 날짜 오름차순으로 정렬된 행 시퀀스.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    rows: Vec<Row>,
}

impl Series {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&Row> {
        self.rows.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// 마지막 `n`개 행만 남긴 시퀀스.
    pub fn tail(&self, n: usize) -> Series {
        let skip = self.rows.len().saturating_sub(n);
        Series::new(self.rows[skip..].to_vec())
    }

    /// 모든 행에 등장하는 컬럼명 (처음 등장한 순서).
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            for column in row.columns() {
                if !names.iter().any(|n| n == column) {
                    names.push(column.clone());
                }
            }
        }
        names
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.rows.iter().any(|row| row.contains(column))
    }

    /// 숫자 컬럼을 Decimal 벡터로 추출합니다.
    ///
    /// 컬럼이 없거나 값이 null/숫자가 아닌 행이 있으면 `ParseFailure`.
    /// 결측을 구간 공백으로 다루지 않으므로 호출 측에서 먼저 정리해야 합니다.
    pub fn decimal_column(&self, column: &str) -> Result<Vec<Decimal>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.decimal(column).ok_or_else(|| {
                    CollectorError::ParseFailure(format!(
                        "column '{}' missing or non-numeric at row {}",
                        column, i
                    ))
                })
            })
            .collect()
    }

    /// 계산된 컬럼을 각 행 끝에 추가합니다.
    ///
    /// 기존 컬럼은 절대 덮어쓰지 않습니다.
    pub fn append_column(&mut self, column: &str, values: Vec<Option<Decimal>>) -> Result<()> {
        self.append_values(column, values.into_iter().map(decimal_value).collect())
    }

    /// JSON 값 컬럼을 각 행 끝에 추가합니다.
    pub fn append_values(&mut self, column: &str, values: Vec<Value>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(CollectorError::InvalidParameter(format!(
                "column '{}' has {} values for {} rows",
                column,
                values.len(),
                self.rows.len()
            )));
        }

        if self.has_column(column) {
            return Err(CollectorError::InvalidParameter(format!(
                "column '{}' already exists",
                column
            )));
        }

        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(column, value);
        }

        Ok(())
    }

    /// 컬럼명을 바꾼 새 시퀀스를 반환합니다.
    pub fn renamed(&self, mapping: &[(&str, &str)]) -> Series {
        Series::new(self.rows.iter().map(|row| row.renamed(mapping)).collect())
    }
}

impl From<Vec<Row>> for Series {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Row> for Series {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Series {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample_series() -> Series {
        (0..3)
            .map(|i| {
                Row::new()
                    .with("date", format!("2024-01-0{}", i + 1))
                    .with("close", 100 + i)
            })
            .collect()
    }

    #[test]
    fn test_empty_marker() {
        let marker = Row::empty_marker();
        assert!(marker.is_empty_marker());
        assert_eq!(serde_json::to_value(&marker).unwrap(), json!({"error": "empty"}));

        let other = Row::new().with("error", "empty").with("date", "2024-01-01");
        assert!(!other.is_empty_marker());
    }

    #[test]
    fn test_decimal_parsing() {
        let row = Row::new()
            .with("a", 1.5)
            .with("b", "1,234.5")
            .with("c", Value::Null)
            .with("d", "n/a")
            .with("e", 7);

        assert_eq!(row.decimal("a"), Some(dec!(1.5)));
        assert_eq!(row.decimal("b"), Some(dec!(1234.5)));
        assert_eq!(row.decimal("c"), None);
        assert_eq!(row.decimal("d"), None);
        assert_eq!(row.decimal("e"), Some(dec!(7)));
        assert_eq!(row.decimal("missing"), None);
    }

    #[test]
    fn test_renamed_keeps_position() {
        let row = Row::new()
            .with("date", "2024-01-01")
            .with("Close", 10)
            .with("extra", true);

        let renamed = row.renamed(&[("Close", "close")]);
        let columns: Vec<&String> = renamed.columns().collect();
        assert_eq!(columns, vec!["date", "close", "extra"]);
        assert!(row.contains("Close"), "원본은 변경되지 않아야 함");
    }

    #[test]
    fn test_renamed_does_not_clobber_existing_target() {
        let row = Row::new().with("Close", 1).with("close", 2);
        let renamed = row.renamed(&[("Close", "close")]);

        assert_eq!(renamed.get("Close"), Some(&json!(1)));
        assert_eq!(renamed.get("close"), Some(&json!(2)));
    }

    #[test]
    fn test_decimal_column() {
        let series = sample_series();
        assert_eq!(
            series.decimal_column("close").unwrap(),
            vec![dec!(100), dec!(101), dec!(102)]
        );

        let err = series.decimal_column("volume").unwrap_err();
        assert!(matches!(err, CollectorError::ParseFailure(_)));
    }

    #[test]
    fn test_decimal_column_null_cell() {
        let series = Series::new(vec![
            Row::new().with("close", 100),
            Row::new().with("close", Value::Null),
            Row::new().with("close", 102),
        ]);

        let err = series.decimal_column("close").unwrap_err();

        assert!(matches!(err, CollectorError::ParseFailure(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_append_column() {
        let mut series = sample_series();
        series
            .append_column("SMA_2", vec![None, Some(dec!(100.5)), Some(dec!(101.5))])
            .unwrap();

        assert_eq!(series.column_names(), vec!["date", "close", "SMA_2"]);
        assert_eq!(series.rows()[0].get("SMA_2"), Some(&Value::Null));
        assert_eq!(series.rows()[1].get("SMA_2"), Some(&json!(100.5)));
    }

    #[test]
    fn test_append_column_rejects_existing_and_length_mismatch() {
        let mut series = sample_series();

        let err = series
            .append_column("close", vec![None, None, None])
            .unwrap_err();
        assert!(matches!(err, CollectorError::InvalidParameter(_)));

        let err = series.append_column("SMA_2", vec![None]).unwrap_err();
        assert!(matches!(err, CollectorError::InvalidParameter(_)));
    }

    #[test]
    fn test_tail() {
        let series = sample_series();
        let last = series.tail(1);
        assert_eq!(last.len(), 1);
        assert_eq!(last.rows()[0].get("date"), Some(&json!("2024-01-03")));
        assert_eq!(series.tail(10).len(), 3);
    }
}
