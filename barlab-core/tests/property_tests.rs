//! Property tests for simulator invariants.
//!
//! Uses proptest to verify:
//! 1. Equity accounting: one point per bar, never negative, last point = final capital
//! 2. Single position: trades never overlap
//! 3. Determinism: identical inputs give identical outputs
//! 4. Buy-and-hold without costs tracks the price ratio
//! 5. Protective exits fill at their thresholds

use barlab_core::domain::{Bar, BarSeries, ExitReason};
use barlab_core::engine::{simulate, CostModel, ExitRules, SimulationConfig};
use barlab_core::strategy::{BuyAndHold, Strategy as BacktestStrategy, StrategyParams, StrategyType};
use chrono::NaiveDate;
use proptest::prelude::*;

// ── Helpers ──────────────────────────────────────────────────────────

fn series_from_closes(closes: &[f64]) -> BarSeries {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) * 1.01,
                low: open.min(close) * 0.99,
                close,
                volume: 1_000,
            }
        })
        .collect();
    BarSeries::new(bars).unwrap()
}

fn small_params() -> StrategyParams {
    StrategyParams {
        fast_period: 3,
        slow_period: 8,
        rsi_period: 5,
        macd_fast: 3,
        macd_slow: 8,
        macd_signal: 3,
        bb_period: 6,
        ..StrategyParams::default()
    }
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(5.0..500.0_f64, 2..150)
}

fn arb_kind() -> impl Strategy<Value = StrategyType> {
    prop::sample::select(StrategyType::ALL.to_vec())
}

fn arb_costs() -> impl Strategy<Value = CostModel> {
    (0.0..0.01_f64, 0.0..0.01_f64).prop_map(|(slip, comm)| CostModel::new(slip, comm))
}

fn arb_exits() -> impl Strategy<Value = ExitRules> {
    (
        prop::option::of(0.01..0.5_f64),
        prop::option::of(0.01..1.0_f64),
    )
        .prop_map(|(stop_loss, take_profit)| ExitRules {
            stop_loss,
            take_profit,
        })
}

// ── 1-3. Accounting, single position, determinism ────────────────────

proptest! {
    #[test]
    fn equity_curve_is_aligned_and_non_negative(
        closes in arb_closes(),
        kind in arb_kind(),
        costs in arb_costs(),
        exits in arb_exits(),
        size in 0.1..=1.0_f64,
    ) {
        let series = series_from_closes(&closes);
        let strategy = BacktestStrategy::new(kind, &small_params()).unwrap();
        let config = SimulationConfig::new(10_000.0)
            .with_position_size(size)
            .with_costs(costs)
            .with_exits(exits);

        let out = simulate(&series, &strategy, &config);

        prop_assert_eq!(out.equity_curve.len(), series.len());
        prop_assert!(out.equity_curve.iter().all(|v| v.is_finite() && *v >= 0.0));
        prop_assert_eq!(out.equity_curve.last().copied(), Some(out.final_capital));
        prop_assert!(out.total_commission >= 0.0);
    }

    #[test]
    fn trades_never_overlap(
        closes in arb_closes(),
        kind in arb_kind(),
        exits in arb_exits(),
    ) {
        let series = series_from_closes(&closes);
        let strategy = BacktestStrategy::new(kind, &small_params()).unwrap();
        let config = SimulationConfig::new(10_000.0).with_exits(exits);

        let out = simulate(&series, &strategy, &config);

        for trade in &out.trades {
            prop_assert!(trade.exit_date >= trade.entry_date);
            prop_assert!(trade.shares > 0.0);
        }
        for pair in out.trades.windows(2) {
            prop_assert!(pair[1].entry_date > pair[0].exit_date);
        }
        // Only the final trade can be force-closed.
        let forced = out
            .trades
            .iter()
            .filter(|t| t.exit_reason == ExitReason::EndOfPeriod)
            .count();
        prop_assert!(forced <= 1);
        if forced == 1 {
            prop_assert_eq!(out.trades.last().map(|t| t.exit_reason), Some(ExitReason::EndOfPeriod));
        }
    }

    #[test]
    fn simulation_is_deterministic(
        closes in arb_closes(),
        kind in arb_kind(),
        costs in arb_costs(),
    ) {
        let series = series_from_closes(&closes);
        let strategy = BacktestStrategy::new(kind, &small_params()).unwrap();
        let config = SimulationConfig::new(25_000.0).with_costs(costs);

        let a = simulate(&series, &strategy, &config);
        let b = simulate(&series, &strategy, &config);
        prop_assert_eq!(a, b);
    }
}

// ── 4. Buy-and-hold tracks price ─────────────────────────────────────

proptest! {
    #[test]
    fn frictionless_buy_and_hold_tracks_price_ratio(closes in arb_closes()) {
        let series = series_from_closes(&closes);
        let out = simulate(&series, &BuyAndHold, &SimulationConfig::new(10_000.0));

        let first = closes[0];
        let last = closes[closes.len() - 1];
        let expected = 10_000.0 * last / first;
        prop_assert!(
            ((out.final_capital - expected) / expected).abs() < 1e-9,
            "final={} expected={}", out.final_capital, expected
        );
        prop_assert_eq!(out.trades.len(), 1);
        prop_assert_eq!(out.trades[0].exit_reason, ExitReason::EndOfPeriod);
    }
}

// ── 5. Protective exit fills ─────────────────────────────────────────

proptest! {
    #[test]
    fn protective_exits_fill_at_threshold(
        closes in arb_closes(),
        exits in arb_exits(),
        slip in 0.0..0.01_f64,
    ) {
        let series = series_from_closes(&closes);
        let config = SimulationConfig::new(10_000.0)
            .with_costs(CostModel::new(slip, 0.0))
            .with_exits(exits);

        let out = simulate(&series, &BuyAndHold, &config);

        for trade in &out.trades {
            match trade.exit_reason {
                ExitReason::StopLoss => {
                    let sl = exits.stop_loss.unwrap();
                    let expected = trade.entry_price * (1.0 - sl) * (1.0 - slip);
                    prop_assert!((trade.exit_price - expected).abs() < 1e-9 * expected.max(1.0));
                }
                ExitReason::TakeProfit => {
                    let tp = exits.take_profit.unwrap();
                    let expected = trade.entry_price * (1.0 + tp) * (1.0 - slip);
                    prop_assert!((trade.exit_price - expected).abs() < 1e-9 * expected.max(1.0));
                }
                _ => {}
            }
        }
    }
}
