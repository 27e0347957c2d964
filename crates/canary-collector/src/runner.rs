//! 명령 실행.
//!
//! 설정에서 데이터 소스를 만들고 수집기 하나를 실행한 뒤 결과를 JSON 값으로 반환합니다.
//! 인증키가 필요한 소스는 해당 명령이 실행될 때만 생성됩니다.

use std::sync::Arc;

use canary_analytics::{
    MomentumParams, TechIndicatorCollector, TrendParams, VolatilityParams, VolumeParams,
};
use canary_core::{OutputRecord, Result, TimeRange};
use canary_data::{
    EcosClient, FredClient, KrMacroCollector, KrShortCollector, KrxShortClient, OhlcvCollector,
    UsMacroCollector, UsShortCollector, YahooPriceSource, YahooShortSource,
};
use serde_json::Value;
use tracing::info;

use crate::cli::{
    Command, IndicatorFamily, KrShortAction, MacroAction, MacroRegion, OhlcvAction, RangeArgs,
    ShortMarket,
};
use crate::config::CollectorConfig;

/// 명령을 실행하고 결과를 JSON 값으로 반환합니다.
pub async fn execute(command: Command, config: &CollectorConfig) -> Result<Value> {
    match command {
        Command::Ohlcv { action } => run_ohlcv(action).await.map(into_value),
        Command::Macro { region } => run_macro(region, config).await,
        Command::Short { market } => run_short(market, config).await.map(into_value),
        Command::Indicator { family } => run_indicator(family).await.map(into_value),
    }
}

async fn run_ohlcv(action: OhlcvAction) -> Result<OutputRecord> {
    let source = Arc::new(YahooPriceSource::new()?);

    match action {
        OhlcvAction::Latest { ticker } => OhlcvCollector::new(source, ticker).latest().await,
        OhlcvAction::Between { range } => {
            OhlcvCollector::new(source, range.ticker)
                .between(&range.start, &range.end, &range.interval)
                .await
        }
    }
}

async fn run_macro(region: MacroRegion, config: &CollectorConfig) -> Result<Value> {
    match region {
        MacroRegion::Us { action } => match action {
            MacroAction::Keys => Ok(keys_value(UsMacroCollector::keys())),
            MacroAction::Latest { key } => {
                let collector = UsMacroCollector::new(Arc::new(fred_client(config)?));
                collector.latest(&key).await.map(into_value)
            }
            MacroAction::Between { key, start, end } => {
                let collector = UsMacroCollector::new(Arc::new(fred_client(config)?));
                collector.between(&key, &start, &end).await.map(into_value)
            }
        },
        MacroRegion::Kr { action } => match action {
            MacroAction::Keys => Ok(keys_value(KrMacroCollector::keys())),
            MacroAction::Latest { key } => {
                let collector = KrMacroCollector::new(Arc::new(ecos_client(config)?));
                collector.latest(&key).await.map(into_value)
            }
            MacroAction::Between { key, start, end } => {
                let collector = KrMacroCollector::new(Arc::new(ecos_client(config)?));
                collector.between(&key, &start, &end).await.map(into_value)
            }
        },
    }
}

async fn run_short(market: ShortMarket, config: &CollectorConfig) -> Result<OutputRecord> {
    match market {
        ShortMarket::Us { ticker } => {
            let source = YahooShortSource::new()?;
            UsShortCollector::new(Arc::new(source), ticker).latest().await
        }
        ShortMarket::Kr { action } => {
            let mut client = KrxShortClient::new(config.http.timeout())?;
            if let Some(url) = &config.endpoints.krx_base_url {
                client = client.with_base_url(url);
            }
            let source = Arc::new(client);

            match action {
                KrShortAction::Latest { ticker } => {
                    KrShortCollector::new(source, ticker)?.latest().await
                }
                KrShortAction::Between { ticker, start, end } => {
                    KrShortCollector::new(source, ticker)?
                        .between(&start, &end)
                        .await
                }
            }
        }
    }
}

async fn run_indicator(family: IndicatorFamily) -> Result<OutputRecord> {
    let collector = TechIndicatorCollector::new();

    match family {
        IndicatorFamily::Trend { range, sma, ema } => {
            let (series, time_range) = download(&range).await?;
            collector.trend(&range.ticker, &series, &TrendParams { sma, ema }, time_range)
        }
        IndicatorFamily::Momentum { range, rsi, macd } => {
            let (series, time_range) = download(&range).await?;
            collector.momentum(
                &range.ticker,
                &series,
                &MomentumParams { rsi, macd },
                time_range,
            )
        }
        IndicatorFamily::Volatility {
            range,
            bb_window,
            bb_std,
            atr,
        } => {
            let (series, time_range) = download(&range).await?;
            collector.volatility(
                &range.ticker,
                &series,
                &VolatilityParams {
                    bb_window,
                    bb_std,
                    atr,
                },
                time_range,
            )
        }
        IndicatorFamily::Volume { range, obv, vma } => {
            let (series, time_range) = download(&range).await?;
            collector.volume(&range.ticker, &series, &VolumeParams { obv, vma }, time_range)
        }
    }
}

/// 지표 계산 입력용 기간 시세.
async fn download(range: &RangeArgs) -> Result<(canary_core::Series, TimeRange)> {
    let source = Arc::new(YahooPriceSource::new()?);
    let series = OhlcvCollector::new(source, range.ticker.as_str())
        .history(&range.start, &range.end, &range.interval)
        .await?;

    info!(ticker = %range.ticker, rows = series.len(), "지표 입력 시세 다운로드 완료");

    let time_range = TimeRange::between(range.start.as_str(), range.end.as_str())
        .with_interval(range.interval.as_str());
    Ok((series, time_range))
}

fn fred_client(config: &CollectorConfig) -> Result<FredClient> {
    let client = FredClient::new(config.fred_credentials()?, config.http.timeout())?;
    Ok(match &config.endpoints.fred_base_url {
        Some(url) => client.with_base_url(url),
        None => client,
    })
}

fn ecos_client(config: &CollectorConfig) -> Result<EcosClient> {
    let client = EcosClient::new(config.ecos_credentials()?, config.http.timeout())?;
    Ok(match &config.endpoints.ecos_base_url {
        Some(url) => client.with_base_url(url),
        None => client,
    })
}

fn into_value(record: OutputRecord) -> Value {
    Value::Object(record.to_map())
}

fn keys_value(keys: Vec<&'static str>) -> Value {
    Value::Array(keys.into_iter().map(Value::from).collect())
}
