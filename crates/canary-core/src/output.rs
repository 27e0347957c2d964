//! 수집 결과 공통 출력 레코드.
//!
//! 모든 수집기는 하나의 [`OutputRecord`]를 반환합니다. 반환 타입을 플래그로
//! 분기하지 않고, 매핑 형태가 필요하면 [`OutputRecord::to_map`]으로 명시적으로
//! 변환합니다.
//!
//! # 직렬화 형태
//!
//! ```json
//! {
//!   "ticker": "AAPL",
//!   "type": "between",
//!   "data": [{"date": "2024-01-02", "close": 185.64}],
//!   "start": "2024-01-01",
//!   "end": "2024-02-01",
//!   "interval": "1d"
//! }
//! ```
//!
//! `type`과 `interval`은 값이 없으면 생략됩니다.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CollectorError, Result};
use crate::row::{Row, Series};

/// 레코드 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// 단일 시점 조회
    Latest,
    /// 기간 조회
    Between,
    /// 추세 지표 (SMA/EMA)
    Trend,
    /// 모멘텀 지표 (RSI/MACD)
    Momentum,
    /// 변동성 지표 (BBANDS/ATR)
    Volatility,
    /// 거래량 지표 (OBV/VMA)
    Volume,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Latest => "latest",
            RecordType::Between => "between",
            RecordType::Trend => "trend",
            RecordType::Momentum => "momentum",
            RecordType::Volatility => "volatility",
            RecordType::Volume => "volume",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 레코드 본문.
///
/// 단일 시점 조회는 `Single`, 기간 조회와 지표 계산은 `Rows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordData {
    Single(Row),
    Rows(Series),
}

impl RecordData {
    /// `{"error": "empty"}` 마커.
    pub fn empty() -> Self {
        RecordData::Single(Row::empty_marker())
    }

    /// 빈 결과 마커인지 확인합니다.
    pub fn is_empty_marker(&self) -> bool {
        matches!(self, RecordData::Single(row) if row.is_empty_marker())
    }

    pub fn as_single(&self) -> Option<&Row> {
        match self {
            RecordData::Single(row) => Some(row),
            RecordData::Rows(_) => None,
        }
    }

    pub fn as_rows(&self) -> Option<&Series> {
        match self {
            RecordData::Rows(series) => Some(series),
            RecordData::Single(_) => None,
        }
    }

    /// JSON 값으로 변환합니다.
    pub fn to_value(&self) -> Value {
        match self {
            RecordData::Single(row) => Value::Object(row.as_map().clone()),
            RecordData::Rows(series) => Value::Array(
                series
                    .iter()
                    .map(|row| Value::Object(row.as_map().clone()))
                    .collect(),
            ),
        }
    }
}

impl From<Row> for RecordData {
    fn from(row: Row) -> Self {
        RecordData::Single(row)
    }
}

impl From<Series> for RecordData {
    fn from(series: Series) -> Self {
        RecordData::Rows(series)
    }
}

/// 조회 기간 및 인터벌.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<String>,
    pub end: Option<String>,
    pub interval: Option<String>,
}

impl TimeRange {
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
            interval: None,
        }
    }

    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }
}

/// 정규화된 수집 결과 레코드.
///
/// 수집 호출마다 한 번 생성되며 생성 후에는 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    ticker: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<RecordType>,
    data: RecordData,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interval: Option<String>,
}

impl OutputRecord {
    /// 유형과 기간이 없는 레코드 생성.
    pub fn new(ticker: impl Into<String>, data: impl Into<RecordData>) -> Self {
        Self {
            ticker: ticker.into(),
            kind: None,
            data: data.into(),
            start: None,
            end: None,
            interval: None,
        }
    }

    /// 빈 결과 마커 레코드 생성.
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self::new(ticker, RecordData::empty())
    }

    pub fn with_type(mut self, kind: RecordType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_time_range(mut self, range: TimeRange) -> Self {
        self.start = range.start;
        self.end = range.end;
        self.interval = range.interval;
        self
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn record_type(&self) -> Option<RecordType> {
        self.kind
    }

    pub fn data(&self) -> &RecordData {
        &self.data
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    pub fn interval(&self) -> Option<&str> {
        self.interval.as_deref()
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            start: self.start.clone(),
            end: self.end.clone(),
            interval: self.interval.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty_marker()
    }

    /// 평범한 중첩 매핑으로 변환합니다.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("ticker".to_string(), Value::String(self.ticker.clone()));
        if let Some(kind) = self.kind {
            map.insert("type".to_string(), Value::String(kind.as_str().to_string()));
        }
        map.insert("data".to_string(), self.data.to_value());
        map.insert("start".to_string(), optional_string(&self.start));
        map.insert("end".to_string(), optional_string(&self.end));
        if self.interval.is_some() {
            map.insert("interval".to_string(), optional_string(&self.interval));
        }
        map
    }

    /// [`to_map`](Self::to_map)의 역변환.
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(map))
            .map_err(|e| CollectorError::ParseFailure(format!("invalid output record: {}", e)))
    }

    /// `key: value` 줄 형태의 텍스트로 렌더링합니다.
    ///
    /// 문자열은 따옴표 없이, 나머지 값은 JSON으로 출력합니다.
    pub fn to_prompt(&self) -> String {
        self.to_map()
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{}: {}", key, s),
                Value::Null => format!("{}: None", key),
                other => format!("{}: {}", key, other),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn optional_string(value: &Option<String>) -> Value {
    value
        .as_ref()
        .map(|s| Value::String(s.clone()))
        .unwrap_or(Value::Null)
}
