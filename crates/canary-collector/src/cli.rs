//! 명령줄 인터페이스 정의.

use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(name = "canary-collector")]
#[command(about = "Market, macro and short-interest data collector", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// 결과 JSON 들여쓰기
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// OHLCV 시세 (Yahoo Finance)
    Ohlcv {
        #[command(subcommand)]
        action: OhlcvAction,
    },

    /// 거시경제 지표 (FRED, ECOS)
    Macro {
        #[command(subcommand)]
        region: MacroRegion,
    },

    /// 공매도 현황 (Yahoo Finance, KRX)
    Short {
        #[command(subcommand)]
        market: ShortMarket,
    },

    /// 기술적 지표 (기간 시세를 내려받아 계산)
    Indicator {
        #[command(subcommand)]
        family: IndicatorFamily,
    },
}

#[derive(Subcommand, Debug)]
pub enum OhlcvAction {
    /// 최근 거래일 시세
    Latest {
        #[arg(long)]
        ticker: String,
    },
    /// 기간 시세
    Between {
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum MacroRegion {
    /// 미국 (FRED)
    Us {
        #[command(subcommand)]
        action: MacroAction,
    },
    /// 한국 (한국은행 ECOS)
    Kr {
        #[command(subcommand)]
        action: MacroAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum MacroAction {
    /// 최신 관측값
    Latest {
        #[arg(long)]
        key: String,
    },
    /// 기간 관측값
    Between {
        #[arg(long)]
        key: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// 지원 지표 키 목록
    Keys,
}

#[derive(Subcommand, Debug)]
pub enum ShortMarket {
    /// 미국 종목 공매도 통계
    Us {
        #[arg(long)]
        ticker: String,
    },
    /// 한국 종목 공매도 거래량/잔고
    Kr {
        #[command(subcommand)]
        action: KrShortAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum KrShortAction {
    /// 최근 거래일 공매도 현황
    Latest {
        #[arg(long)]
        ticker: String,
    },
    /// 기간 공매도 현황
    Between {
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
}

/// 티커와 조회 기간.
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    #[arg(long)]
    pub ticker: String,
    /// 시작일 (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,
    /// 종료일 (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,
    #[arg(long, default_value = "1d")]
    pub interval: String,
}

#[derive(Subcommand, Debug)]
pub enum IndicatorFamily {
    /// SMA/EMA
    Trend {
        #[command(flatten)]
        range: RangeArgs,
        /// SMA 기간 (쉼표로 구분)
        #[arg(long, value_delimiter = ',', default_values_t = vec![20, 60])]
        sma: Vec<usize>,
        /// EMA 기간 (쉼표로 구분)
        #[arg(long, value_delimiter = ',', default_values_t = vec![12, 26])]
        ema: Vec<usize>,
    },
    /// RSI/MACD
    Momentum {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value_t = 14)]
        rsi: usize,
        /// MACD 계산 여부 (true/false)
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        macd: bool,
    },
    /// 볼린저 밴드/ATR
    Volatility {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value_t = 20)]
        bb_window: usize,
        #[arg(long, default_value = "2.0")]
        bb_std: Decimal,
        #[arg(long, default_value_t = 14)]
        atr: usize,
    },
    /// OBV/거래량 이동평균
    Volume {
        #[command(flatten)]
        range: RangeArgs,
        /// OBV 계산 여부 (true/false)
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        obv: bool,
        #[arg(long, default_value_t = 20)]
        vma: usize,
    },
}
