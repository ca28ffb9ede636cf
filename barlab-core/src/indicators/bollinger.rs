//! Bollinger Bands: SMA(period) ± k × sample standard deviation.
//!
//! Uses the sample standard deviation (divide by N - 1), so `period` must be
//! at least 2 for the bands to be defined. First valid value at `period - 1`.

use super::sma::sma;

/// Upper, middle and lower band series, NaN during warm-up.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger(values: &[f64], period: usize, k: f64) -> BollingerBands {
    let n = values.len();
    let middle = sma(values, period);
    let mut upper = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];

    if period >= 2 && n >= period {
        for i in (period - 1)..n {
            let window = &values[i + 1 - period..=i];
            let mean = middle[i];
            let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (period - 1) as f64;
            let sd = var.sqrt();
            upper[i] = mean + k * sd;
            lower[i] = mean - k * sd;
        }
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}
