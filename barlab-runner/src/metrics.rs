//! Performance metrics: pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: equity curve and/or trade list in, scalar out.
//! Every result is finite; anything that would divide by zero falls back to 0.

use barlab_core::domain::Trade;
use serde::{Deserialize, Serialize};

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub final_value: f64,
    pub total_return: f64,
    pub annual_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    /// Positive fraction in [0, 1].
    pub max_drawdown: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub avg_win: f64,
    /// Magnitude of the average losing trade (positive).
    pub avg_loss: f64,
    pub avg_win_loss_ratio: f64,
    pub profit_factor: f64,
    pub benchmark_return: f64,
    pub alpha: f64,
}

impl PerformanceMetrics {
    /// Compute all metrics.
    ///
    /// `elapsed_days` is the calendar span of the series. `benchmark_return` is
    /// the buy-and-hold total return over the same bars.
    pub fn compute(
        equity_curve: &[f64],
        trades: &[Trade],
        initial_capital: f64,
        elapsed_days: i64,
        benchmark_return: f64,
    ) -> Self {
        let final_value = equity_curve.last().copied().unwrap_or(initial_capital);
        let total_return = finite_or_zero(total_return(final_value, initial_capital));
        let benchmark_return = finite_or_zero(benchmark_return);
        let winning_trades = trades.iter().filter(|t| t.is_winner()).count();
        let losing_trades = trades.iter().filter(|t| t.is_loser()).count();

        Self {
            final_value,
            total_return,
            annual_return: finite_or_zero(annual_return(total_return, elapsed_days)),
            volatility: finite_or_zero(volatility(equity_curve)),
            sharpe_ratio: finite_or_zero(sharpe_ratio(equity_curve)),
            max_drawdown: finite_or_zero(max_drawdown(equity_curve)),
            total_trades: trades.len(),
            winning_trades,
            losing_trades,
            win_rate: win_rate(trades),
            avg_win: finite_or_zero(avg_win(trades)),
            avg_loss: finite_or_zero(avg_loss(trades)),
            avg_win_loss_ratio: finite_or_zero(avg_win_loss_ratio(trades)),
            profit_factor: finite_or_zero(profit_factor(trades)),
            benchmark_return,
            alpha: total_return - benchmark_return,
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: final / initial - 1.
pub fn total_return(final_value: f64, initial_capital: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    final_value / initial_capital - 1.0
}

/// Compound annual growth rate over `elapsed_days` calendar days.
///
/// `(1 + total_return) ^ (365.25 / elapsed_days) - 1`; 0.0 when no time elapsed.
pub fn annual_return(total_return: f64, elapsed_days: i64) -> f64 {
    if elapsed_days <= 0 {
        return 0.0;
    }
    let growth = 1.0 + total_return;
    if growth <= 0.0 {
        return -1.0;
    }
    growth.powf(365.25 / elapsed_days as f64) - 1.0
}

/// Annualized standard deviation of daily returns.
///
/// Returns 0.0 with fewer than 2 return observations.
pub fn volatility(equity_curve: &[f64]) -> f64 {
    let returns = daily_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Annualized Sharpe ratio from daily returns, risk-free rate 0.
///
/// Sharpe = mean(daily returns) / std(daily returns) * sqrt(252).
/// Returns 0.0 if variance is zero or there are fewer than 2 returns.
pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
    let returns = daily_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Maximum drawdown as a positive fraction (0.15 = 15% below the running peak).
///
/// Returns 0.0 if equity never falls below a previous peak.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    drawdown_curve(equity_curve)
        .into_iter()
        .fold(0.0_f64, |worst, dd| worst.max(-dd))
        .clamp(0.0, 1.0)
}

/// Per-bar drawdown `(value - peak) / peak`, always <= 0.
pub fn drawdown_curve(equity_curve: &[f64]) -> Vec<f64> {
    let mut peak = f64::MIN;
    equity_curve
        .iter()
        .map(|&eq| {
            peak = peak.max(eq);
            if peak > 0.0 {
                ((eq - peak) / peak).min(0.0)
            } else {
                0.0
            }
        })
        .collect()
}

/// Win rate: fraction of trades with positive PnL.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Mean PnL of winning trades.
pub fn avg_win(trades: &[Trade]) -> f64 {
    let wins: Vec<f64> = trades.iter().filter(|t| t.is_winner()).map(|t| t.pnl).collect();
    mean_f64(&wins)
}

/// Mean absolute PnL of losing trades.
pub fn avg_loss(trades: &[Trade]) -> f64 {
    let losses: Vec<f64> = trades
        .iter()
        .filter(|t| t.is_loser())
        .map(|t| t.pnl.abs())
        .collect();
    mean_f64(&losses)
}

/// avg_win / avg_loss; 0.0 when there are no losses.
pub fn avg_win_loss_ratio(trades: &[Trade]) -> f64 {
    let loss = avg_loss(trades);
    if loss <= 0.0 {
        return 0.0;
    }
    avg_win(trades) / loss
}

/// Gross profit / gross loss; 0.0 when there are no losses.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let gross_profit: f64 = trades.iter().filter(|t| t.is_winner()).map(|t| t.pnl).sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.is_loser())
        .map(|t| t.pnl.abs())
        .sum();
    if gross_loss < 1e-10 {
        return 0.0;
    }
    gross_profit / gross_loss
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Period-over-period returns of an equity curve.
pub fn daily_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0] > 0.0 {
                (w[1] - w[0]) / w[0]
            } else {
                0.0
            }
        })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barlab_core::domain::ExitReason;
    use chrono::NaiveDate;

    fn make_trade(pnl: f64) -> Trade {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        Trade {
            entry_date: date,
            exit_date: date + chrono::Duration::days(5),
            entry_price: 100.0,
            exit_price: 100.0 + pnl / 50.0,
            shares: 50.0,
            pnl,
            return_pct: pnl / 5000.0,
            hold_days: 5,
            entry_reason: "test".into(),
            exit_reason: ExitReason::Signal,
            commission_paid: 0.0,
        }
    }

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn total_return_basic() {
        approx(total_return(110_000.0, 100_000.0), 0.10);
        approx(total_return(90_000.0, 100_000.0), -0.10);
        assert_eq!(total_return(1.0, 0.0), 0.0);
    }

    #[test]
    fn annual_return_one_year_equals_total() {
        approx(annual_return(0.10, 365), 1.10_f64.powf(365.25 / 365.0) - 1.0);
        assert!((annual_return(0.10, 365) - 0.10).abs() < 1e-3);
    }

    #[test]
    fn annual_return_zero_days_is_zero() {
        assert_eq!(annual_return(0.5, 0), 0.0);
    }

    #[test]
    fn annual_return_total_loss() {
        assert_eq!(annual_return(-1.0, 100), -1.0);
    }

    #[test]
    fn sharpe_constant_equity_is_zero() {
        assert_eq!(sharpe_ratio(&[100.0; 10]), 0.0);
        assert_eq!(sharpe_ratio(&[100.0]), 0.0);
        assert_eq!(sharpe_ratio(&[]), 0.0);
    }

    #[test]
    fn sharpe_positive_for_noisy_uptrend() {
        let eq = [100.0, 102.0, 101.0, 104.0, 103.0, 107.0];
        assert!(sharpe_ratio(&eq) > 0.0);
    }

    #[test]
    fn volatility_needs_two_returns() {
        assert_eq!(volatility(&[100.0, 110.0]), 0.0);
        assert!(volatility(&[100.0, 110.0, 99.0]) > 0.0);
    }

    #[test]
    fn max_drawdown_basic() {
        // peak 120, trough 90 → 25%
        approx(max_drawdown(&[100.0, 120.0, 90.0, 110.0]), 0.25);
    }

    #[test]
    fn max_drawdown_monotonic_is_zero() {
        assert_eq!(max_drawdown(&[100.0, 101.0, 102.0]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn drawdown_curve_tracks_running_peak() {
        let dd = drawdown_curve(&[100.0, 120.0, 90.0, 120.0]);
        assert_eq!(dd.len(), 4);
        approx(dd[0], 0.0);
        approx(dd[1], 0.0);
        approx(dd[2], -0.25);
        approx(dd[3], 0.0);
    }

    #[test]
    fn trade_statistics() {
        let trades = vec![make_trade(100.0), make_trade(-50.0), make_trade(200.0), make_trade(-150.0)];
        approx(win_rate(&trades), 0.5);
        approx(avg_win(&trades), 150.0);
        approx(avg_loss(&trades), 100.0);
        approx(avg_win_loss_ratio(&trades), 1.5);
        approx(profit_factor(&trades), 1.5);
    }

    #[test]
    fn no_losses_gives_zero_profit_factor() {
        let trades = vec![make_trade(100.0)];
        assert_eq!(profit_factor(&trades), 0.0);
        assert_eq!(avg_win_loss_ratio(&trades), 0.0);
    }

    #[test]
    fn zero_trades() {
        let m = PerformanceMetrics::compute(&[1000.0; 5], &[], 1000.0, 4, 0.02);
        assert_eq!(m.total_trades, 0);
        assert_eq!(m.win_rate, 0.0);
        assert_eq!(m.sharpe_ratio, 0.0);
        assert_eq!(m.total_return, 0.0);
        approx(m.alpha, -0.02);
    }

    #[test]
    fn compute_final_value_identity() {
        let eq = [1000.0, 1100.0, 1050.0];
        let m = PerformanceMetrics::compute(&eq, &[], 1000.0, 2, 0.0);
        approx(m.final_value, 1000.0 * (1.0 + m.total_return));
    }

    #[test]
    fn empty_curve_falls_back_to_initial_capital() {
        let m = PerformanceMetrics::compute(&[], &[], 500.0, 0, 0.0);
        assert_eq!(m.final_value, 500.0);
        assert_eq!(m.total_return, 0.0);
        assert_eq!(m.annual_return, 0.0);
    }

    #[test]
    fn non_finite_benchmark_collapses_to_zero() {
        let m = PerformanceMetrics::compute(&[1.0, 1.0], &[], 1.0, 1, f64::NAN);
        assert_eq!(m.benchmark_return, 0.0);
        assert_eq!(m.alpha, 0.0);
    }
}
