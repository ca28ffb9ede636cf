//! Relative Strength Index (RSI).
//!
//! Simple (non-Wilder) averaging: avg_gain and avg_loss are the plain means of
//! the last `period` close-to-close gains and losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss). First valid value at index `period`.
//! Edge cases: avg_loss == 0 with gains → 100; no movement at all → 50.

/// RSI of `values`, NaN during warm-up.
pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];
    for i in 1..n {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            gains[i] = change;
        } else {
            losses[i] = -change;
        }
    }

    let mut gain_sum: f64 = gains[1..=period].iter().sum();
    let mut loss_sum: f64 = losses[1..=period].iter().sum();
    result[period] = rsi_from_sums(gain_sum, loss_sum);

    for i in (period + 1)..n {
        gain_sum += gains[i] - gains[i - period];
        loss_sum += losses[i] - losses[i - period];
        result[i] = rsi_from_sums(gain_sum, loss_sum);
    }
    result
}

fn rsi_from_sums(gain_sum: f64, loss_sum: f64) -> f64 {
    // Rolling sums can drift a hair below zero.
    let gain = gain_sum.max(0.0);
    let loss = loss_sum.max(0.0);
    if loss <= f64::EPSILON {
        if gain <= f64::EPSILON {
            50.0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + gain / loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rsi_basic() {
        // changes: +2, -1, +1, -2 → gains 3, losses 3 over 4 → RSI 50
        let result = rsi(&[10.0, 12.0, 11.0, 12.0, 10.0], 4);
        assert!(result[..4].iter().all(|v| v.is_nan()));
        assert_approx(result[4], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_uneven() {
        // changes: +3, -1 → avg_gain 1.5, avg_loss 0.5 → RS 3 → RSI 75
        let result = rsi(&[10.0, 13.0, 12.0], 2);
        assert_approx(result[2], 75.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let result = rsi(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_approx(result[3], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let result = rsi(&[4.0, 3.0, 2.0, 1.0], 3);
        assert_approx(result[3], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_flat_is_50() {
        let result = rsi(&[5.0; 6], 3);
        assert_approx(result[5], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_window_rolls() {
        // at index 3 the +10 change has left the window; two -1 changes remain
        let result = rsi(&[10.0, 20.0, 19.0, 18.0], 2);
        assert_approx(result[3], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_bounded() {
        let values = [44.0, 44.3, 44.1, 43.6, 44.3, 44.8, 45.1, 45.4, 45.8, 46.1, 45.9, 46.0];
        for v in rsi(&values, 5).into_iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(&v));
        }
    }
}
