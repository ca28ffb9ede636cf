//! Strategy policies: map visible bar history to a trading decision.
//!
//! Policies are stateless. Every call to [`DecisionPolicy::decide`] recomputes
//! whatever indicators it needs from the slice it is given, and the simulator
//! only ever hands over `bars[..=i]`. A policy therefore cannot see the future,
//! and it never sees position or capital state either.
//!
//! The set of strategies is closed: [`Strategy`] has one variant per
//! [`StrategyType`], resolved once from configuration before a run starts.

pub mod bollinger_breakout;
pub mod buy_hold;
pub mod catalog;
pub mod ma_crossover;
pub mod macd_cross;
pub mod rsi_reversal;

pub use bollinger_breakout::BollingerBreakout;
pub use buy_hold::BuyAndHold;
pub use catalog::{available_strategies, describe, ParamInfo, ParamKind, StrategyInfo};
pub use ma_crossover::MaCrossover;
pub use macd_cross::MacdCrossover;
pub use rsi_reversal::RsiReversal;

use crate::domain::Bar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a policy wants to do on the current bar.
///
/// The simulator ignores `Enter` while long and `Exit` while flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Enter,
    Exit,
    Hold,
}

/// A decision-producing strategy.
///
/// # Architecture invariant
/// `decide` receives only bar history ending at the current bar. It must be a
/// pure function of that slice and the policy's own parameters.
pub trait DecisionPolicy: Send + Sync {
    /// Registered identifier (e.g. "ma_cross").
    fn name(&self) -> &str;

    /// Minimum history length before the policy can return anything but `Hold`.
    fn warmup_bars(&self) -> usize;

    /// Decide on the last bar of `history`.
    fn decide(&self, history: &[Bar]) -> Decision;

    /// Human-readable reason attached to trades opened by this policy.
    fn entry_reason(&self) -> &'static str;
}

/// Errors raised while resolving a strategy from configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    #[error("unknown strategy type '{0}'")]
    UnknownType(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Registered strategy identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    BuyHold,
    MaCross,
    RsiReversal,
    MacdCross,
    BbBreakout,
}

impl StrategyType {
    pub const ALL: [StrategyType; 5] = [
        StrategyType::BuyHold,
        StrategyType::MaCross,
        StrategyType::RsiReversal,
        StrategyType::MacdCross,
        StrategyType::BbBreakout,
    ];

    pub fn id(self) -> &'static str {
        match self {
            StrategyType::BuyHold => "buy_hold",
            StrategyType::MaCross => "ma_cross",
            StrategyType::RsiReversal => "rsi_reversal",
            StrategyType::MacdCross => "macd_cross",
            StrategyType::BbBreakout => "bb_breakout",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StrategyType::BuyHold => "Buy & Hold",
            StrategyType::MaCross => "Moving Average Crossover",
            StrategyType::RsiReversal => "RSI Mean Reversion",
            StrategyType::MacdCross => "MACD Crossover",
            StrategyType::BbBreakout => "Bollinger Band Breakout",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StrategyType {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        StrategyType::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| StrategyError::UnknownType(s.to_string()))
    }
}

/// Tunable parameters for every strategy. Each strategy reads only its own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_std: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            fast_period: 50,
            slow_period: 200,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_std: 2.0,
        }
    }
}

/// The closed set of strategies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Strategy {
    BuyHold(BuyAndHold),
    MaCross(MaCrossover),
    RsiReversal(RsiReversal),
    MacdCross(MacdCrossover),
    BbBreakout(BollingerBreakout),
}

impl Strategy {
    /// Resolve a strategy variant, validating the parameters it uses.
    pub fn new(kind: StrategyType, params: &StrategyParams) -> Result<Self, StrategyError> {
        Ok(match kind {
            StrategyType::BuyHold => Strategy::BuyHold(BuyAndHold),
            StrategyType::MaCross => {
                Strategy::MaCross(MaCrossover::new(params.fast_period, params.slow_period)?)
            }
            StrategyType::RsiReversal => Strategy::RsiReversal(RsiReversal::new(
                params.rsi_period,
                params.rsi_oversold,
                params.rsi_overbought,
            )?),
            StrategyType::MacdCross => Strategy::MacdCross(MacdCrossover::new(
                params.macd_fast,
                params.macd_slow,
                params.macd_signal,
            )?),
            StrategyType::BbBreakout => {
                Strategy::BbBreakout(BollingerBreakout::new(params.bb_period, params.bb_std)?)
            }
        })
    }

    pub fn kind(&self) -> StrategyType {
        match self {
            Strategy::BuyHold(_) => StrategyType::BuyHold,
            Strategy::MaCross(_) => StrategyType::MaCross,
            Strategy::RsiReversal(_) => StrategyType::RsiReversal,
            Strategy::MacdCross(_) => StrategyType::MacdCross,
            Strategy::BbBreakout(_) => StrategyType::BbBreakout,
        }
    }

    fn policy(&self) -> &dyn DecisionPolicy {
        match self {
            Strategy::BuyHold(s) => s,
            Strategy::MaCross(s) => s,
            Strategy::RsiReversal(s) => s,
            Strategy::MacdCross(s) => s,
            Strategy::BbBreakout(s) => s,
        }
    }
}

impl DecisionPolicy for Strategy {
    fn name(&self) -> &str {
        self.policy().name()
    }

    fn warmup_bars(&self) -> usize {
        self.policy().warmup_bars()
    }

    fn decide(&self, history: &[Bar]) -> Decision {
        self.policy().decide(history)
    }

    fn entry_reason(&self) -> &'static str {
        self.policy().entry_reason()
    }
}

// ─── Helpers ───

/// `a` crossed above `b` between the previous and current bar.
pub(crate) fn crossed_above(prev_a: f64, prev_b: f64, cur_a: f64, cur_b: f64) -> bool {
    prev_a <= prev_b && cur_a > cur_b
}

/// `a` crossed below `b` between the previous and current bar.
pub(crate) fn crossed_below(prev_a: f64, prev_b: f64, cur_a: f64, cur_b: f64) -> bool {
    prev_a >= prev_b && cur_a < cur_b
}

pub(crate) fn require_positive(name: &'static str, value: usize) -> Result<(), StrategyError> {
    if value == 0 {
        return Err(StrategyError::InvalidParameter {
            name,
            reason: "must be at least 1".into(),
        });
    }
    Ok(())
}
