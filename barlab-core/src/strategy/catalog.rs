//! Strategy catalogue for selection controls and `barlab strategies`.

use super::{StrategyParams, StrategyType};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Integer,
    Float,
}

/// One tunable parameter, named as it appears in the `[params]` config table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamInfo {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub parameters: Vec<ParamInfo>,
}

/// Every registered strategy, in a stable order.
pub fn available_strategies() -> Vec<StrategyInfo> {
    StrategyType::ALL.into_iter().map(describe).collect()
}

pub fn describe(kind: StrategyType) -> StrategyInfo {
    let d = StrategyParams::default();
    let int = |name, default: usize, description| ParamInfo {
        name,
        kind: ParamKind::Integer,
        default: default as f64,
        description,
    };
    let float = |name, default: f64, description| ParamInfo {
        name,
        kind: ParamKind::Float,
        default,
        description,
    };

    let (description, parameters) = match kind {
        StrategyType::BuyHold => (
            "Buy on the first bar and hold until the end of the period",
            vec![],
        ),
        StrategyType::MaCross => (
            "Buy when the fast SMA crosses above the slow SMA, sell on the reverse cross",
            vec![
                int("fast_period", d.fast_period, "Fast moving average period"),
                int("slow_period", d.slow_period, "Slow moving average period"),
            ],
        ),
        StrategyType::RsiReversal => (
            "Buy when RSI drops into oversold territory, sell when it rises into overbought",
            vec![
                int("rsi_period", d.rsi_period, "RSI lookback period"),
                float("rsi_oversold", d.rsi_oversold, "Oversold threshold"),
                float("rsi_overbought", d.rsi_overbought, "Overbought threshold"),
            ],
        ),
        StrategyType::MacdCross => (
            "Buy when the MACD line crosses above its signal line, sell on the reverse cross",
            vec![
                int("macd_fast", d.macd_fast, "Fast EMA period"),
                int("macd_slow", d.macd_slow, "Slow EMA period"),
                int("macd_signal", d.macd_signal, "Signal line EMA period"),
            ],
        ),
        StrategyType::BbBreakout => (
            "Buy when price closes above the upper Bollinger band, sell below the middle band",
            vec![
                int("bb_period", d.bb_period, "Moving average period"),
                float("bb_std", d.bb_std, "Band width in standard deviations"),
            ],
        ),
    };

    StrategyInfo {
        id: kind.id(),
        display_name: kind.display_name(),
        description,
        parameters,
    }
}
