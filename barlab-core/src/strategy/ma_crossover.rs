//! Moving-average crossover: golden cross enters, death cross exits.

use super::{crossed_above, crossed_below, require_positive, Decision, DecisionPolicy, StrategyError};
use crate::domain::Bar;
use crate::indicators::{last_two, sma, tail_closes};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaCrossover {
    fast_period: usize,
    slow_period: usize,
}

impl MaCrossover {
    pub fn new(fast_period: usize, slow_period: usize) -> Result<Self, StrategyError> {
        require_positive("fast_period", fast_period)?;
        require_positive("slow_period", slow_period)?;
        if fast_period >= slow_period {
            return Err(StrategyError::InvalidParameter {
                name: "fast_period",
                reason: format!("must be less than slow_period ({fast_period} >= {slow_period})"),
            });
        }
        Ok(Self {
            fast_period,
            slow_period,
        })
    }

    pub fn fast_period(&self) -> usize {
        self.fast_period
    }

    pub fn slow_period(&self) -> usize {
        self.slow_period
    }
}

impl DecisionPolicy for MaCrossover {
    fn name(&self) -> &str {
        "ma_cross"
    }

    /// First bar on which both averages are defined.
    fn warmup_bars(&self) -> usize {
        self.slow_period
    }

    /// An undefined slow average on the previous bar counts as "fast not
    /// above slow", so a trend already under way enters on the first
    /// defined bar.
    fn decide(&self, history: &[Bar]) -> Decision {
        if history.len() < self.warmup_bars() {
            return Decision::Hold;
        }
        let closes = tail_closes(history, self.slow_period + 1);
        let fast = sma(&closes, self.fast_period);
        let slow = sma(&closes, self.slow_period);

        match (last_two(&fast), last_two(&slow)) {
            (Some((prev_fast, cur_fast)), Some((prev_slow, cur_slow))) => {
                if crossed_above(prev_fast, prev_slow, cur_fast, cur_slow) {
                    Decision::Enter
                } else if crossed_below(prev_fast, prev_slow, cur_fast, cur_slow) {
                    Decision::Exit
                } else {
                    Decision::Hold
                }
            }
            _ => match (fast.last(), slow.last()) {
                (Some(cur_fast), Some(cur_slow)) if cur_fast > cur_slow => Decision::Enter,
                _ => Decision::Hold,
            },
        }
    }

    fn entry_reason(&self) -> &'static str {
        "golden cross"
    }
}
