//! Pure indicator functions.
//!
//! Each function maps a slice of values to a series of the same length, with
//! NaN during warm-up. Strategies call them on the visible history only, so an
//! indicator value at index `i` can never depend on data after `i`.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger, BollingerBands};
pub use ema::ema;
pub use macd::{macd, MacdSeries};
pub use rsi::rsi;
pub use sma::sma;

use crate::domain::Bar;

/// Close prices of the last `len` bars (or all of them if fewer).
pub fn tail_closes(bars: &[Bar], len: usize) -> Vec<f64> {
    let start = bars.len().saturating_sub(len);
    bars[start..].iter().map(|b| b.close).collect()
}

/// The last two values of a series, if both are defined.
pub fn last_two(series: &[f64]) -> Option<(f64, f64)> {
    match series {
        [.., prev, cur] if prev.is_finite() && cur.is_finite() => Some((*prev, *cur)),
        _ => None,
    }
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for the first bar), high/low = max/min(open, close) ± 1,
/// volume = 1000, consecutive calendar days from 2024-01-02.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.01),
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
