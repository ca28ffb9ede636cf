//! Cost model: slippage and commission, both as fractions.
//!
//! Slippage is directional: buyers pay more, sellers receive less.
//! Commission is charged per side on fill notional.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Fraction of price, applied against the trader.
    pub slippage: f64,
    /// Fraction of notional, per side.
    pub commission: f64,
}

impl CostModel {
    pub fn new(slippage: f64, commission: f64) -> Self {
        Self {
            slippage,
            commission,
        }
    }

    pub fn frictionless() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Price after slippage.
    pub fn fill_price(&self, raw_price: f64, side: Side) -> f64 {
        match side {
            Side::Buy => raw_price * (1.0 + self.slippage),
            Side::Sell => raw_price * (1.0 - self.slippage),
        }
    }

    /// `commission = fill_price * shares * commission_rate`
    pub fn commission_for(&self, fill_price: f64, shares: f64) -> f64 {
        fill_price * shares * self.commission
    }

    /// Shares affordable with `budget` at `fill_price` once entry commission is paid.
    pub fn affordable_shares(&self, budget: f64, fill_price: f64) -> f64 {
        if budget <= 0.0 || fill_price <= 0.0 {
            return 0.0;
        }
        budget / (fill_price * (1.0 + self.commission))
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::frictionless()
    }
}
