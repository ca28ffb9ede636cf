//! Exponential Moving Average (EMA).
//!
//! EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seeded with the SMA of the first `period` finite values, so leading NaNs
//! (e.g. the warm-up of another indicator) are skipped rather than propagated.

/// EMA of `values`, NaN until the seed window is filled.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 {
        return result;
    }

    let Some(start) = values.iter().position(|v| v.is_finite()) else {
        return result;
    };
    let seed_end = start + period;
    if seed_end > n {
        return result;
    }

    let seed = &values[start..seed_end];
    if seed.iter().any(|v| !v.is_finite()) {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = seed.iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = prev;

    for i in seed_end..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }
    result
}
