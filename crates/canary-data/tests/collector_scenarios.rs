//! HTTP 클라이언트와 수집기를 연결한 시나리오 테스트
//!
//! mockito 서버로 업스트림 응답을 흉내 내고, 수집기가 만든 출력 레코드를 검증합니다.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use canary_core::{CollectorError, Credentials, OutputRecord, RecordType, Result};
use canary_data::{
    EcosClient, FredClient, KrMacroCollector, KrShortCollector, KrxShortClient, UsMacroCollector,
    ShortInterestSource, UsShortCollector,
};
use mockito::Matcher;
use serde_json::{json, Map, Value};

const TIMEOUT: Duration = Duration::from_secs(5);

fn fred(url: String) -> FredClient {
    FredClient::new(Credentials::new("FRED_API_KEY", "fred-key").unwrap(), TIMEOUT)
        .unwrap()
        .with_base_url(url)
}

#[tokio::test]
async fn fred_between_with_no_observations_yields_empty_marker() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/fred/series/observations")
        .match_query(Matcher::UrlEncoded("series_id".into(), "CPIAUCSL".into()))
        .with_status(200)
        .with_body(r#"{"observations":[]}"#)
        .create_async()
        .await;

    let collector = UsMacroCollector::new(Arc::new(fred(server.url())));
    let record = collector
        .between("CPI", "2031-01-01", "2031-12-31")
        .await
        .unwrap();

    let map = record.to_map();
    assert_eq!(map["ticker"], json!("cpi"));
    assert_eq!(map["type"], json!("between"));
    assert_eq!(map["data"], json!({"error": "empty"}));
    assert_eq!(map["start"], json!("2031-01-01"));
    assert!(!map.contains_key("interval"));
}

#[tokio::test]
async fn fred_latest_skips_missing_values() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/fred/series/observations")
        .match_query(Matcher::UrlEncoded("series_id".into(), "DGS2".into()))
        .with_status(200)
        .with_body(
            r#"{"observations":[
                {"date":"2024-05-01","value":"4.87"},
                {"date":"2024-05-02","value":"."}
            ]}"#,
        )
        .create_async()
        .await;

    let collector = UsMacroCollector::new(Arc::new(fred(server.url())));
    let record = collector.latest("2_year_bonds").await.unwrap();

    assert_eq!(
        record.data().to_value(),
        json!({"date": "2024-05-01", "2_year_bonds": 4.87})
    );

    let restored = OutputRecord::from_map(record.to_map()).unwrap();
    assert_eq!(restored, record);
}

#[tokio::test]
async fn fred_transport_failure_is_connection_failure() {
    // 연결을 받지 않는 주소
    let collector = UsMacroCollector::new(Arc::new(fred("http://127.0.0.1:9".to_string())));

    let err = collector.latest("gdp").await.unwrap_err();

    assert!(matches!(err, CollectorError::ConnectionFailure(_)));
}

#[tokio::test]
async fn ecos_backs_both_kr_macro_paths() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"{"StatisticSearch":{"list_total_count":2,"row":[
        {"TIME":"20240102","DATA_VALUE":"1,300.5"},
        {"TIME":"20240103","DATA_VALUE":"1,310.2"}
    ]}}"#;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/StatisticSearch/ecos-key/json/kr/1/10000/731Y001/D/".into()))
        .with_status(200)
        .with_body(body)
        .expect(2)
        .create_async()
        .await;

    let client = EcosClient::new(Credentials::new("ECOS_API_KEY", "ecos-key").unwrap(), TIMEOUT)
        .unwrap()
        .with_base_url(server.url());
    let collector = KrMacroCollector::new(Arc::new(client));

    let latest = collector.latest("usd_krw").await.unwrap();
    let between = collector
        .between("usd_krw", "2024-01-01", "2024-01-31")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        latest.data().to_value(),
        json!({"date": "2024-01-03", "usd_krw": 1310.2})
    );
    assert_eq!(between.data().as_rows().unwrap().len(), 2);
}

#[tokio::test]
async fn krx_short_between_joins_on_date() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/comm/bldAttendant/getJsonData.cmd")
        .match_body(Matcher::UrlEncoded(
            "bld".into(),
            "dbms/MDC/STAT/srt/MDCSTAT30502".into(),
        ))
        .with_status(200)
        .with_body(
            r#"{"OutBlock_1":[
                {"RPT_DUTY_OCCR_DD":"2024/01/02","BAL_QTY":"3,000,000","BAL_AMT":"234,000,000,000"},
                {"RPT_DUTY_OCCR_DD":"2024/01/03","BAL_QTY":"3,100,000","BAL_AMT":"240,000,000,000"}
            ]}"#,
        )
        .create_async()
        .await;
    server
        .mock("POST", "/comm/bldAttendant/getJsonData.cmd")
        .match_body(Matcher::UrlEncoded(
            "bld".into(),
            "dbms/MDC/STAT/srt/MDCSTAT30102".into(),
        ))
        .with_status(200)
        .with_body(
            r#"{"OutBlock_1":[
                {"TRD_DD":"2024/01/03","CVSRTSELL_TRDVOL":"250,000","CVSRTSELL_TRDVAL":"19,000,000,000"},
                {"TRD_DD":"2024/01/04","CVSRTSELL_TRDVOL":"120,000","CVSRTSELL_TRDVAL":"9,000,000,000"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = KrxShortClient::new(TIMEOUT).unwrap().with_base_url(server.url());
    let collector = KrShortCollector::new(Arc::new(client), "005930").unwrap();

    let record = collector.between("2024-01-02", "2024-01-04").await.unwrap();

    assert_eq!(record.record_type(), Some(RecordType::Between));
    assert_eq!(
        record.data().to_value(),
        json!([{
            "date": "2024-01-03",
            "short_volume": 250000.0,
            "short_value": 19000000000.0,
            "short_balance": 3100000.0,
            "short_balance_value": 240000000000.0
        }])
    );
}

/// 고정된 통계를 돌려주는 미국 공매도 소스.
struct StaticShortInterest(Map<String, Value>);

#[async_trait]
impl ShortInterestSource for StaticShortInterest {
    async fn short_interest(&self, _ticker: &str) -> Result<Map<String, Value>> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn us_short_latest_fills_missing_fields() {
    let stats = json!({
        "sharesShort": 80_000_000,
        "shortRatio": 0.9,
        "dateShortInterest": 1_706_659_200
    });
    let source = StaticShortInterest(stats.as_object().unwrap().clone());

    let record = UsShortCollector::new(Arc::new(source), "TSLA")
        .latest()
        .await
        .unwrap();

    let prompt = record.to_prompt();
    assert!(prompt.contains("ticker: TSLA"));
    assert!(prompt.contains("type: latest"));

    let row = record.data().as_single().unwrap();
    assert_eq!(row.get("sharesShort"), Some(&json!(80_000_000)));
    assert_eq!(row.get("dateShortInterest"), Some(&json!(1_706_659_200)));
    assert_eq!(row.get("floatShares"), Some(&Value::Null));
}

#[tokio::test]
async fn us_short_without_statistics_yields_empty_marker() {
    let source = StaticShortInterest(Map::new());

    let record = UsShortCollector::new(Arc::new(source), "ZZZZ")
        .latest()
        .await
        .unwrap();

    assert!(record.data().is_empty_marker());
    assert_eq!(record.record_type(), Some(RecordType::Latest));
}
