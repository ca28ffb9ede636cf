//! RSI mean reversion: buy the dip into oversold, sell the rally into overbought.

use super::{require_positive, Decision, DecisionPolicy, StrategyError};
use crate::domain::Bar;
use crate::indicators::{last_two, rsi, tail_closes};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiReversal {
    period: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiReversal {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Result<Self, StrategyError> {
        require_positive("rsi_period", period)?;
        if !(0.0..=100.0).contains(&oversold) {
            return Err(StrategyError::InvalidParameter {
                name: "rsi_oversold",
                reason: format!("must be within [0, 100], got {oversold}"),
            });
        }
        if !(0.0..=100.0).contains(&overbought) {
            return Err(StrategyError::InvalidParameter {
                name: "rsi_overbought",
                reason: format!("must be within [0, 100], got {overbought}"),
            });
        }
        if oversold >= overbought {
            return Err(StrategyError::InvalidParameter {
                name: "rsi_oversold",
                reason: format!("must be below rsi_overbought ({oversold} >= {overbought})"),
            });
        }
        Ok(Self {
            period,
            oversold,
            overbought,
        })
    }
}

impl DecisionPolicy for RsiReversal {
    fn name(&self) -> &str {
        "rsi_reversal"
    }

    fn warmup_bars(&self) -> usize {
        self.period + 2
    }

    fn decide(&self, history: &[Bar]) -> Decision {
        if history.len() < self.warmup_bars() {
            return Decision::Hold;
        }
        let closes = tail_closes(history, self.warmup_bars());
        let Some((prev, cur)) = last_two(&rsi(&closes, self.period)) else {
            return Decision::Hold;
        };

        if prev >= self.oversold && cur < self.oversold {
            Decision::Enter
        } else if prev <= self.overbought && cur > self.overbought {
            Decision::Exit
        } else {
            Decision::Hold
        }
    }

    fn entry_reason(&self) -> &'static str {
        "rsi oversold"
    }
}
