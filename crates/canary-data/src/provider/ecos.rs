//! 한국은행 ECOS (경제통계시스템) API 클라이언트.
//!
//! # URL 구성
//!
//! ```text
//! {base}/StatisticSearch/{인증키}/json/kr/1/10000/{통계표}/{주기}/{시작}/{종료}/{항목1}/{항목2}/{항목3}
//! ```
//!
//! 시작/종료 시점은 주기별 형식(A: `YYYY`, Q: `YYYYQn`, M: `YYYYMM`, D: `YYYYMMDD`)을 따르며,
//! 지정하지 않으면 1900년 1월부터 2099년 12월까지 조회합니다.

use std::time::Duration;

use async_trait::async_trait;
use canary_core::{CollectorError, Credentials, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http::{build_client, ensure_success, map_reqwest_error, parse_number, read_json};
use crate::source::{Observation, StatCycle, StatisticsSource};

/// ECOS API 기본 URL.
pub const ECOS_BASE_URL: &str = "https://ecos.bok.or.kr/api";

const PROVIDER: &str = "ECOS";

/// 정상 응답 코드.
const CODE_OK: &str = "INFO-000";
/// 데이터 없음 응답 코드.
const CODE_NO_DATA: &str = "INFO-200";

/// 한 번에 조회하는 최대 행 수.
const MAX_ROWS: u32 = 10_000;

#[derive(Debug, Deserialize)]
struct EcosResponse {
    #[serde(rename = "StatisticSearch")]
    statistic_search: Option<StatisticSearch>,
    #[serde(rename = "RESULT")]
    result: Option<EcosResult>,
}

#[derive(Debug, Deserialize)]
struct StatisticSearch {
    #[serde(default)]
    row: Vec<EcosRow>,
}

#[derive(Debug, Deserialize)]
struct EcosRow {
    #[serde(rename = "TIME")]
    time: String,
    #[serde(rename = "DATA_VALUE")]
    data_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EcosResult {
    #[serde(rename = "CODE")]
    code: String,
    #[serde(rename = "MESSAGE", default)]
    message: String,
}

/// ECOS API 클라이언트.
pub struct EcosClient {
    client: reqwest::Client,
    credentials: Credentials,
    base_url: String,
}

impl EcosClient {
    /// 새로운 ECOS 클라이언트 생성.
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            credentials,
            base_url: ECOS_BASE_URL.to_string(),
        })
    }

    /// 기본 URL 변경 (프록시/테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_url(
        &self,
        key: &str,
        stat_code: &str,
        item_codes: &[&str],
        cycle: StatCycle,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> String {
        let start = start
            .map(|d| format_period(d, cycle))
            .unwrap_or_else(|| default_period(cycle, true));
        let end = end
            .map(|d| format_period(d, cycle))
            .unwrap_or_else(|| default_period(cycle, false));

        let mut url = format!(
            "{}/StatisticSearch/{}/json/kr/1/{}/{}/{}/{}/{}",
            self.base_url,
            key,
            MAX_ROWS,
            stat_code,
            cycle.code(),
            start,
            end
        );
        for item in item_codes.iter().filter(|item| !item.is_empty()) {
            url.push('/');
            url.push_str(item);
        }
        url
    }
}

#[async_trait]
impl StatisticsSource for EcosClient {
    async fn get_series(
        &self,
        stat_code: &str,
        item_codes: &[&str],
        cycle: StatCycle,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>> {
        let url = self.build_url(
            self.credentials.api_key(),
            stat_code,
            item_codes,
            cycle,
            start,
            end,
        );

        debug!(
            stat_code,
            cycle = cycle.code(),
            url = %self.build_url("***", stat_code, item_codes, cycle, start, end),
            "ECOS 통계 요청"
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(PROVIDER, e))?;
        let response = ensure_success(PROVIDER, response).await?;
        let parsed: EcosResponse = read_json(PROVIDER, response).await?;

        if let Some(result) = parsed.result {
            match result.code.as_str() {
                CODE_OK => {}
                CODE_NO_DATA => {
                    warn!(stat_code, message = %result.message, "ECOS 조회 결과 없음");
                    return Ok(Vec::new());
                }
                _ => {
                    return Err(CollectorError::Api {
                        provider: PROVIDER.to_string(),
                        message: format!("{}: {}", result.code, result.message),
                    })
                }
            }
        }

        let rows = parsed
            .statistic_search
            .map(|search| search.row)
            .unwrap_or_default();

        let mut observations = Vec::with_capacity(rows.len());
        for row in rows {
            let date = parse_period(&row.time, cycle).ok_or_else(|| {
                CollectorError::ParseFailure(format!(
                    "ECOS TIME 파싱 실패 '{}' (주기 {})",
                    row.time,
                    cycle.code()
                ))
            })?;

            // 숫자가 아닌 값은 제외
            if let Some(value) = row.data_value.as_deref().and_then(parse_number) {
                observations.push(Observation { date, value });
            }
        }

        observations.sort_by_key(|o| o.date);
        Ok(observations)
    }
}

/// 날짜를 주기별 ECOS 시점 문자열로 변환합니다.
pub fn format_period(date: NaiveDate, cycle: StatCycle) -> String {
    match cycle {
        StatCycle::Annual => format!("{:04}", date.year()),
        StatCycle::Quarterly => format!("{:04}Q{}", date.year(), (date.month() - 1) / 3 + 1),
        StatCycle::Monthly => date.format("%Y%m").to_string(),
        StatCycle::Daily => date.format("%Y%m%d").to_string(),
    }
}

fn default_period(cycle: StatCycle, is_start: bool) -> String {
    let (year, month, day) = if is_start { (1900, 1, 1) } else { (2099, 12, 31) };
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => format_period(date, cycle),
        None => String::new(),
    }
}

/// ECOS `TIME` 값을 해당 기간의 첫날로 파싱합니다.
pub fn parse_period(time: &str, cycle: StatCycle) -> Option<NaiveDate> {
    let time = time.trim();
    match cycle {
        StatCycle::Annual => {
            let year: i32 = time.get(..4)?.parse().ok()?;
            NaiveDate::from_ymd_opt(year, 1, 1)
        }
        StatCycle::Quarterly => {
            let (year, quarter) = time.split_once('Q')?;
            let year: i32 = year.parse().ok()?;
            let quarter: u32 = quarter.parse().ok()?;
            if !(1..=4).contains(&quarter) {
                return None;
            }
            NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)
        }
        StatCycle::Monthly => NaiveDate::parse_from_str(&format!("{}01", time), "%Y%m%d").ok(),
        StatCycle::Daily => NaiveDate::parse_from_str(time, "%Y%m%d").ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client(url: String) -> EcosClient {
        EcosClient::new(
            Credentials::new("ECOS_API_KEY", "ecos-key").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(url)
    }

    #[test]
    fn test_format_period() {
        let d = date(2024, 8, 15);
        assert_eq!(format_period(d, StatCycle::Annual), "2024");
        assert_eq!(format_period(d, StatCycle::Quarterly), "2024Q3");
        assert_eq!(format_period(d, StatCycle::Monthly), "202408");
        assert_eq!(format_period(d, StatCycle::Daily), "20240815");
    }

    #[test]
    fn test_default_period() {
        assert_eq!(default_period(StatCycle::Monthly, true), "190001");
        assert_eq!(default_period(StatCycle::Monthly, false), "209912");
        assert_eq!(default_period(StatCycle::Quarterly, false), "2099Q4");
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("2023", StatCycle::Annual), Some(date(2023, 1, 1)));
        assert_eq!(parse_period("2023Q2", StatCycle::Quarterly), Some(date(2023, 4, 1)));
        assert_eq!(parse_period("2023Q5", StatCycle::Quarterly), None);
        assert_eq!(parse_period("202311", StatCycle::Monthly), Some(date(2023, 11, 1)));
        assert_eq!(parse_period("20231115", StatCycle::Daily), Some(date(2023, 11, 15)));
        assert_eq!(parse_period("2023-11", StatCycle::Monthly), None);
    }

    #[test]
    fn test_build_url_skips_empty_items() {
        let client = client("http://localhost".to_string());
        let url = client.build_url(
            "KEY",
            "722Y001",
            &["0101000", ""],
            StatCycle::Monthly,
            Some(date(2024, 1, 1)),
            None,
        );

        assert_eq!(
            url,
            "http://localhost/StatisticSearch/KEY/json/kr/1/10000/722Y001/M/202401/209912/0101000"
        );
    }

    #[tokio::test]
    async fn test_get_series_sorted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/StatisticSearch/ecos-key/json/kr/1/10000/722Y001/M/202401/202403/0101000",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"StatisticSearch":{"list_total_count":3,"row":[
                    {"STAT_CODE":"722Y001","TIME":"202403","DATA_VALUE":"3.5"},
                    {"STAT_CODE":"722Y001","TIME":"202401","DATA_VALUE":"3.5"},
                    {"STAT_CODE":"722Y001","TIME":"202402","DATA_VALUE":"-"}
                ]}}"#,
            )
            .create_async()
            .await;

        let observations = client(server.url())
            .get_series(
                "722Y001",
                &["0101000"],
                StatCycle::Monthly,
                Some(date(2024, 1, 1)),
                Some(date(2024, 3, 31)),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].date, date(2024, 1, 1));
        assert_eq!(observations[1].date, date(2024, 3, 1));
        assert_eq!(observations[1].value, dec!(3.5));
    }

    #[tokio::test]
    async fn test_no_data_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"RESULT":{"CODE":"INFO-200","MESSAGE":"해당하는 데이터가 없습니다."}}"#)
            .create_async()
            .await;

        let observations = client(server.url())
            .get_series("722Y001", &["0101000"], StatCycle::Monthly, None, None)
            .await
            .unwrap();

        assert!(observations.is_empty());
    }

    #[tokio::test]
    async fn test_error_code_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"RESULT":{"CODE":"ERROR-100","MESSAGE":"인증키가 유효하지 않습니다."}}"#)
            .create_async()
            .await;

        let err = client(server.url())
            .get_series("722Y001", &["0101000"], StatCycle::Monthly, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CollectorError::Api { .. }));
        assert!(err.to_string().contains("ERROR-100"));
    }
}
