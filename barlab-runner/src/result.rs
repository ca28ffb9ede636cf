//! Backtest result: the immutable output of one run.

use barlab_core::domain::Trade;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::PerformanceMetrics;

/// Current schema version for serialized results.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Complete result of a single backtest run.
///
/// Metrics are flattened into the top level when serialized. Nothing here
/// depends on wall-clock time, so identical inputs serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub ticker: String,
    pub strategy_type: String,
    /// Requested range, inclusive.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
    /// Number of bars simulated.
    pub total_days: usize,
    pub total_commission: f64,
    /// BLAKE3 hash of the bar series the run used.
    pub dataset_hash: String,
    pub trades: Vec<Trade>,
    /// One entry per bar, aligned with `dates`.
    pub equity_curve: Vec<f64>,
    pub dates: Vec<NaiveDate>,
    /// `(value - peak) / peak` per bar, always <= 0.
    pub drawdown_curve: Vec<f64>,
}

impl BacktestResult {
    pub fn final_value(&self) -> f64 {
        self.metrics.final_value
    }

    pub fn total_return(&self) -> f64 {
        self.metrics.total_return
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
