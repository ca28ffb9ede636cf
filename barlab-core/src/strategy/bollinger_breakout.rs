//! Bollinger breakout: close breaks above the upper band, exits below the middle.

use super::{crossed_above, crossed_below, Decision, DecisionPolicy, StrategyError};
use crate::domain::Bar;
use crate::indicators::{bollinger, last_two, tail_closes};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBreakout {
    period: usize,
    num_std: f64,
}

impl BollingerBreakout {
    pub fn new(period: usize, num_std: f64) -> Result<Self, StrategyError> {
        if period < 2 {
            return Err(StrategyError::InvalidParameter {
                name: "bb_period",
                reason: format!("must be at least 2, got {period}"),
            });
        }
        if !num_std.is_finite() || num_std <= 0.0 {
            return Err(StrategyError::InvalidParameter {
                name: "bb_std",
                reason: format!("must be a positive number, got {num_std}"),
            });
        }
        Ok(Self { period, num_std })
    }
}

impl DecisionPolicy for BollingerBreakout {
    fn name(&self) -> &str {
        "bb_breakout"
    }

    fn warmup_bars(&self) -> usize {
        self.period + 1
    }

    fn decide(&self, history: &[Bar]) -> Decision {
        if history.len() < self.warmup_bars() {
            return Decision::Hold;
        }
        let closes = tail_closes(history, self.warmup_bars());
        let bands = bollinger(&closes, self.period, self.num_std);

        let (Some((prev_close, cur_close)), Some((prev_upper, cur_upper)), Some((prev_mid, cur_mid))) =
            (last_two(&closes), last_two(&bands.upper), last_two(&bands.middle))
        else {
            return Decision::Hold;
        };

        if crossed_above(prev_close, prev_upper, cur_close, cur_upper) {
            Decision::Enter
        } else if crossed_below(prev_close, prev_mid, cur_close, cur_mid) {
            Decision::Exit
        } else {
            Decision::Hold
        }
    }

    fn entry_reason(&self) -> &'static str {
        "upper band breakout"
    }
}
