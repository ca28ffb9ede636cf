//! BarLab Runner: backtest orchestration, market data, metrics.
//!
//! This crate builds on `barlab-core` to provide:
//! - `BacktestConfig` loading (TOML) and validation
//! - The `MarketData` collaborator trait with in-memory, CSV and synthetic sources
//! - Performance metrics and the `BacktestResult` payload
//! - Single and parallel batch backtest entry points

pub mod config;
pub mod market_data;
pub mod metrics;
pub mod result;
pub mod runner;

pub use config::{BacktestConfig, ConfigError, ValidatedConfig, ValidationError};
pub use market_data::{CsvMarketData, DataError, InMemoryMarketData, MarketData, SyntheticMarketData};
pub use metrics::PerformanceMetrics;
pub use result::{BacktestResult, SCHEMA_VERSION};
pub use runner::{run_backtest, run_backtest_on_series, run_batch, run_validated, BacktestError};
