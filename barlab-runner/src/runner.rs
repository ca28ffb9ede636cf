//! Backtest orchestrator: validate, fetch, simulate, analyze.
//!
//! Entry points:
//! - `run_backtest()`: validates the config, fetches bars through a [`MarketData`]
//!   source, then runs. Used by the CLI.
//! - `run_backtest_on_series()`: validates, then runs on bars the caller already has.
//! - `run_validated()`: pure simulation + analysis, no I/O and no errors.
//! - `run_batch()`: many independent backtests in parallel.

use barlab_core::domain::BarSeries;
use barlab_core::engine::simulate;
use barlab_core::strategy::{BuyAndHold, DecisionPolicy};
use chrono::NaiveDate;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{BacktestConfig, ValidatedConfig, ValidationError};
use crate::market_data::{DataError, MarketData};
use crate::metrics::{self, PerformanceMetrics};
use crate::result::{BacktestResult, SCHEMA_VERSION};

/// Errors that prevent a backtest from producing a result.
#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("invalid config: {0}")]
    Validation(#[from] ValidationError),

    #[error("no market data for '{ticker}' between {start} and {end}")]
    NoData {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("market data error: {0}")]
    Data(#[from] DataError),
}

/// Run a single backtest, fetching bars from `market_data`.
///
/// Validation happens before any fetch. An empty fetch is [`BacktestError::NoData`].
pub fn run_backtest(
    config: &BacktestConfig,
    market_data: &dyn MarketData,
) -> Result<BacktestResult, BacktestError> {
    let validated = validate_logged(config)?;
    let ticker = validated.ticker();
    let (start, end) = (config.start_date, config.end_date);

    info!(
        ticker,
        strategy = %validated.strategy().kind(),
        %start,
        %end,
        source = market_data.name(),
        "starting backtest"
    );

    let bars = market_data.fetch(ticker, start, end)?;
    if bars.is_empty() {
        warn!(ticker, %start, %end, "no market data");
        return Err(no_data(&validated));
    }
    let series = BarSeries::from_unsorted(bars).map_err(|source| DataError::InvalidSeries {
        ticker: ticker.to_string(),
        source,
    })?;
    info!(ticker, bars = series.len(), "market data fetched");

    Ok(run_logged(&validated, &series))
}

/// Run a single backtest on bars the caller already holds.
pub fn run_backtest_on_series(
    config: &BacktestConfig,
    series: &BarSeries,
) -> Result<BacktestResult, BacktestError> {
    let validated = validate_logged(config)?;
    if series.is_empty() {
        warn!(ticker = validated.ticker(), "no market data");
        return Err(no_data(&validated));
    }
    Ok(run_logged(&validated, series))
}

/// Run many backtests in parallel. Results come back in input order.
pub fn run_batch(
    configs: &[BacktestConfig],
    market_data: &dyn MarketData,
) -> Vec<Result<BacktestResult, BacktestError>> {
    configs
        .par_iter()
        .map(|config| run_backtest(config, market_data))
        .collect()
}

/// Simulate and analyze. Pure and infallible: warm-up shortfalls, zero trades
/// and flat equity all resolve to defined metric values.
pub fn run_validated(validated: &ValidatedConfig, series: &BarSeries) -> BacktestResult {
    let config = validated.config();
    let strategy = validated.strategy();
    let simulation = validated.simulation();

    if series.len() < strategy.warmup_bars() {
        info!(
            bars = series.len(),
            warmup = strategy.warmup_bars(),
            "series shorter than strategy warm-up, no trades possible"
        );
    }

    let output = simulate(series, strategy, simulation);
    let benchmark = simulate(series, &BuyAndHold, &validated.benchmark_simulation());
    let benchmark_return =
        metrics::total_return(benchmark.final_capital, simulation.initial_capital);

    let metrics = PerformanceMetrics::compute(
        &output.equity_curve,
        &output.trades,
        simulation.initial_capital,
        series.elapsed_days(),
        benchmark_return,
    );

    BacktestResult {
        schema_version: SCHEMA_VERSION,
        ticker: config.ticker.clone(),
        strategy_type: strategy.name().to_string(),
        start_date: config.start_date,
        end_date: config.end_date,
        initial_capital: simulation.initial_capital,
        metrics,
        total_days: series.len(),
        total_commission: metrics::finite_or_zero(output.total_commission),
        dataset_hash: series.dataset_hash(),
        drawdown_curve: metrics::drawdown_curve(&output.equity_curve),
        dates: series.dates(),
        equity_curve: output.equity_curve,
        trades: output.trades,
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn validate_logged(config: &BacktestConfig) -> Result<ValidatedConfig, ValidationError> {
    config.validate().map_err(|err| {
        warn!(ticker = %config.ticker, strategy = %config.strategy_type, error = %err, "config rejected");
        err
    })
}

fn run_logged(validated: &ValidatedConfig, series: &BarSeries) -> BacktestResult {
    let result = run_validated(validated, series);
    info!(
        ticker = %result.ticker,
        strategy = %result.strategy_type,
        trades = result.metrics.total_trades,
        total_return = result.metrics.total_return,
        sharpe = result.metrics.sharpe_ratio,
        "backtest complete"
    );
    result
}

fn no_data(validated: &ValidatedConfig) -> BacktestError {
    let config = validated.config();
    BacktestError::NoData {
        ticker: config.ticker.clone(),
        start: config.start_date,
        end: config.end_date,
    }
}
