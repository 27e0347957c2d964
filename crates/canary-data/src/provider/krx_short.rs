//! KRX 정보데이터시스템 공매도 클라이언트.
//!
//! 종목별 공매도 거래량과 공매도 잔고를 일자별로 조회합니다.
//! 요청에는 6자리 단축코드가 아닌 ISIN 표준코드가 필요합니다.
//!
//! # 응답 형식
//!
//! ```json
//! {"OutBlock_1": [{"TRD_DD": "2024/01/02", "CVSRTSELL_TRDVOL": "1,234", ...}]}
//! ```
//!
//! 숫자 필드는 쉼표가 포함된 문자열입니다.

use std::time::Duration;

use async_trait::async_trait;
use canary_core::{CollectorError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::http::{build_client, ensure_success, map_reqwest_error, parse_number, read_json};
use crate::source::{KrShortSource, ShortBalanceRecord, ShortVolumeRecord};

/// KRX 정보데이터시스템 기본 URL.
pub const KRX_BASE_URL: &str = "http://data.krx.co.kr";

const PROVIDER: &str = "KRX";
const JSON_PATH: &str = "/comm/bldAttendant/getJsonData.cmd";

/// 종목별 공매도 거래 현황.
const BLD_SHORT_VOLUME: &str = "dbms/MDC/STAT/srt/MDCSTAT30102";
/// 종목별 공매도 잔고 현황.
const BLD_SHORT_BALANCE: &str = "dbms/MDC/STAT/srt/MDCSTAT30502";

#[derive(Debug, Deserialize)]
struct KrxRows<T> {
    #[serde(rename = "OutBlock_1", alias = "output", default = "Vec::new")]
    rows: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RawShortVolume {
    #[serde(rename = "TRD_DD")]
    date: String,
    #[serde(rename = "CVSRTSELL_TRDVOL")]
    volume: Option<String>,
    #[serde(rename = "CVSRTSELL_TRDVAL")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawShortBalance {
    #[serde(rename = "RPT_DUTY_OCCR_DD")]
    date: String,
    #[serde(rename = "BAL_QTY")]
    balance: Option<String>,
    #[serde(rename = "BAL_AMT")]
    balance_value: Option<String>,
}

/// KRX 공매도 클라이언트.
#[derive(Clone)]
pub struct KrxShortClient {
    client: reqwest::Client,
    base_url: String,
}

impl KrxShortClient {
    /// 새로운 KRX 공매도 클라이언트 생성.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: KRX_BASE_URL.to_string(),
        })
    }

    /// 기본 URL 변경 (프록시/테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn request<T: DeserializeOwned>(
        &self,
        bld: &str,
        isin: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, JSON_PATH);
        let start = start.format("%Y%m%d").to_string();
        let end = end.format("%Y%m%d").to_string();

        debug!(bld, isin, start = %start, end = %end, "KRX 공매도 요청");

        let params = [
            ("bld", bld),
            ("isuCd", isin),
            ("strtDd", start.as_str()),
            ("endDd", end.as_str()),
            ("searchType", "2"),
            ("trdDd", end.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .header("Referer", format!("{}/contents/MDC/MDI/mdiLoader", self.base_url))
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| map_reqwest_error(PROVIDER, e))?;
        let response = ensure_success(PROVIDER, response).await?;

        let data: KrxRows<T> = read_json(PROVIDER, response).await?;
        Ok(data.rows)
    }
}

#[async_trait]
impl KrShortSource for KrxShortClient {
    async fn short_balance(
        &self,
        isin: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ShortBalanceRecord>> {
        let raw: Vec<RawShortBalance> = self.request(BLD_SHORT_BALANCE, isin, start, end).await?;

        let mut records = Vec::with_capacity(raw.len());
        for row in raw {
            let date = parse_krx_date(&row.date)?;
            if let (Some(balance), Some(balance_value)) =
                (number(&row.balance), number(&row.balance_value))
            {
                records.push(ShortBalanceRecord {
                    date,
                    balance,
                    balance_value,
                });
            }
        }

        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    async fn short_volume(
        &self,
        isin: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ShortVolumeRecord>> {
        let raw: Vec<RawShortVolume> = self.request(BLD_SHORT_VOLUME, isin, start, end).await?;

        let mut records = Vec::with_capacity(raw.len());
        for row in raw {
            let date = parse_krx_date(&row.date)?;
            if let (Some(volume), Some(value)) = (number(&row.volume), number(&row.value)) {
                records.push(ShortVolumeRecord {
                    date,
                    volume,
                    value,
                });
            }
        }

        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

fn number(raw: &Option<String>) -> Option<Decimal> {
    raw.as_deref().and_then(parse_number)
}

/// `YYYY/MM/DD` 또는 `YYYYMMDD` 형식의 날짜를 파싱합니다.
fn parse_krx_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let parsed = if raw.contains('/') {
        NaiveDate::parse_from_str(raw, "%Y/%m/%d")
    } else {
        NaiveDate::parse_from_str(raw, "%Y%m%d")
    };
    parsed.map_err(|e| CollectorError::ParseFailure(format!("KRX 날짜 파싱 실패 '{}': {}", raw, e)))
}

/// 6자리 KRX 단축코드인지 확인합니다.
pub fn is_krx_ticker(ticker: &str) -> bool {
    ticker.len() == 6 && ticker.chars().all(|c| c.is_ascii_alphanumeric())
}

/// 6자리 단축코드를 ISIN 표준코드로 변환합니다.
///
/// `KR7` + 단축코드 + `00` + 검증번호(Luhn). 6자리 영숫자가 아니면 `None`.
///
/// ```
/// use canary_data::provider::krx_short::ticker_to_isin;
///
/// assert_eq!(ticker_to_isin("005930").as_deref(), Some("KR7005930003"));
/// ```
pub fn ticker_to_isin(ticker: &str) -> Option<String> {
    if !is_krx_ticker(ticker) {
        return None;
    }

    let body = format!("KR7{}00", ticker.to_ascii_uppercase());
    let check = isin_check_digit(&body)?;
    Some(format!("{}{}", body, check))
}

/// ISIN 검증번호 계산.
///
/// 영문자는 10~35로 치환한 뒤 전체 숫자열에 Luhn 알고리즘을 적용합니다.
fn isin_check_digit(body: &str) -> Option<u32> {
    let mut digits = Vec::with_capacity(body.len() * 2);
    for c in body.chars() {
        let value = c.to_digit(36)?;
        if value >= 10 {
            digits.push(value / 10);
            digits.push(value % 10);
        } else {
            digits.push(value);
        }
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                doubled / 10 + doubled % 10
            } else {
                d
            }
        })
        .sum();

    Some((10 - sum % 10) % 10)
}
