//! MACD crossover: MACD line crossing its signal line.

use super::{crossed_above, crossed_below, require_positive, Decision, DecisionPolicy, StrategyError};
use crate::domain::Bar;
use crate::indicators::{last_two, macd};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdCrossover {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl MacdCrossover {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, StrategyError> {
        require_positive("macd_fast", fast)?;
        require_positive("macd_slow", slow)?;
        require_positive("macd_signal", signal)?;
        if fast >= slow {
            return Err(StrategyError::InvalidParameter {
                name: "macd_fast",
                reason: format!("must be less than macd_slow ({fast} >= {slow})"),
            });
        }
        Ok(Self { fast, slow, signal })
    }
}

impl DecisionPolicy for MacdCrossover {
    fn name(&self) -> &str {
        "macd_cross"
    }

    fn warmup_bars(&self) -> usize {
        self.slow + self.signal
    }

    // EMAs depend on the whole visible history, so no tail window here.
    fn decide(&self, history: &[Bar]) -> Decision {
        if history.len() < self.warmup_bars() {
            return Decision::Hold;
        }
        let closes: Vec<f64> = history.iter().map(|b| b.close).collect();
        let series = macd(&closes, self.fast, self.slow, self.signal);

        let (Some((prev_macd, cur_macd)), Some((prev_sig, cur_sig))) =
            (last_two(&series.macd), last_two(&series.signal))
        else {
            return Decision::Hold;
        };

        if crossed_above(prev_macd, prev_sig, cur_macd, cur_sig) {
            Decision::Enter
        } else if crossed_below(prev_macd, prev_sig, cur_macd, cur_sig) {
            Decision::Exit
        } else {
            Decision::Hold
        }
    }

    fn entry_reason(&self) -> &'static str {
        "macd bullish cross"
    }
}
