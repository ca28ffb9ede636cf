//! Protective exits: stop-loss and take-profit thresholds.
//!
//! Checked intrabar against the bar's low and high. When both would trigger on
//! the same bar the stop wins, since the path inside a daily bar is unknown.

use crate::domain::{Bar, ExitReason, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExitRules {
    /// Fraction below entry, in (0, 1).
    pub stop_loss: Option<f64>,
    /// Fraction above entry, > 0.
    pub take_profit: Option<f64>,
}

/// A fired protective exit and the raw (pre-slippage) price it fills at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitTrigger {
    pub reason: ExitReason,
    pub price: f64,
}

impl ExitRules {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn check(&self, position: &Position, bar: &Bar) -> Option<ExitTrigger> {
        if let Some(sl) = self.stop_loss {
            let stop = position.stop_price(sl);
            if bar.low <= stop {
                return Some(ExitTrigger {
                    reason: ExitReason::StopLoss,
                    price: stop,
                });
            }
        }
        if let Some(tp) = self.take_profit {
            let target = position.target_price(tp);
            if bar.high >= target {
                return Some(ExitTrigger {
                    reason: ExitReason::TakeProfit,
                    price: target,
                });
            }
        }
        None
    }
}
