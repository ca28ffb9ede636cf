//! Buy-and-hold: enter on the first bar, never exit.

use super::{Decision, DecisionPolicy};
use crate::domain::Bar;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BuyAndHold;

impl DecisionPolicy for BuyAndHold {
    fn name(&self) -> &str {
        "buy_hold"
    }

    fn warmup_bars(&self) -> usize {
        1
    }

    /// Enter only on the very first bar. A position closed early by a stop is
    /// not reopened; the forced end-of-period close handles the exit.
    fn decide(&self, history: &[Bar]) -> Decision {
        if history.len() == 1 {
            Decision::Enter
        } else {
            Decision::Hold
        }
    }

    fn entry_reason(&self) -> &'static str {
        "buy and hold"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn enters_on_first_bar_only() {
        let bars = make_bars(&[100.0, 110.0, 90.0]);
        assert_eq!(BuyAndHold.decide(&bars[..1]), Decision::Enter);
        assert_eq!(BuyAndHold.decide(&bars[..2]), Decision::Hold);
        assert_eq!(BuyAndHold.decide(&bars), Decision::Hold);
    }

    #[test]
    fn empty_history_holds() {
        assert_eq!(BuyAndHold.decide(&[]), Decision::Hold);
    }
}
