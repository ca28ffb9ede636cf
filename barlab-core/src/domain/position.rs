//! Position tracking: at most one long position at a time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An open long position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub entry_date: NaiveDate,
    /// Fill price including slippage.
    pub entry_price: f64,
    pub shares: f64,
    pub entry_commission: f64,
    pub entry_reason: String,
}

impl Position {
    pub fn market_value(&self, current_price: f64) -> f64 {
        self.shares * current_price
    }

    /// Capital committed at entry: notional plus entry commission.
    pub fn cost_basis(&self) -> f64 {
        self.shares * self.entry_price + self.entry_commission
    }

    /// Price at or below which a stop-loss of `fraction` fires.
    pub fn stop_price(&self, fraction: f64) -> f64 {
        self.entry_price * (1.0 - fraction)
    }

    /// Price at or above which a take-profit of `fraction` fires.
    pub fn target_price(&self, fraction: f64) -> f64 {
        self.entry_price * (1.0 + fraction)
    }
}

/// Flat or long. Shorting is not modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PositionState {
    #[default]
    Flat,
    Long(Position),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Position {
        Position {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            entry_price: 100.0,
            shares: 10.0,
            entry_commission: 1.0,
            entry_reason: "test".into(),
        }
    }

    #[test]
    fn valuation() {
        let p = sample();
        assert_eq!(p.market_value(110.0), 1100.0);
        assert_eq!(p.cost_basis(), 1001.0);
    }

    #[test]
    fn thresholds() {
        let p = sample();
        assert!((p.stop_price(0.05) - 95.0).abs() < 1e-10);
        assert!((p.target_price(0.10) - 110.0).abs() < 1e-10);
    }

    #[test]
    fn state_defaults_to_flat() {
        assert_eq!(PositionState::default(), PositionState::Flat);
    }
}
