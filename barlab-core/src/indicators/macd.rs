//! Moving Average Convergence/Divergence (MACD).
//!
//! MACD line = EMA(fast) - EMA(slow); signal line = EMA(signal) of the MACD line.
//! MACD is valid from index `slow - 1`, the signal line from `slow + signal - 2`.

use super::ema::ema;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

impl MacdSeries {
    pub fn histogram(&self) -> Vec<f64> {
        self.macd
            .iter()
            .zip(&self.signal)
            .map(|(m, s)| m - s)
            .collect()
    }
}

pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&macd, signal);
    MacdSeries { macd, signal }
}
