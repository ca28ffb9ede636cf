//! Bar and BarSeries: the fundamental market data units.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single instrument on a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Basic sanity check: finite, strictly positive prices and high >= low.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.open > 0.0
            && self.high > 0.0
            && self.low > 0.0
            && self.close > 0.0
    }
}

/// Errors raised while assembling a [`BarSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {index} dated {date} is not after the previous bar ({previous})")]
    Unsorted {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("duplicate bar for {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("bar dated {date} has invalid prices (non-finite, non-positive, or high < low)")]
    InvalidPrices { date: NaiveDate },
}

/// Ordered, immutable sequence of daily bars for one instrument.
///
/// Dates are strictly ascending (gaps allowed, duplicates rejected). The only
/// way to look at bars "as of" index `i` is [`BarSeries::history`], which never
/// exposes bars past `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, rejecting unordered dates, duplicates and broken prices.
    pub fn new(bars: Vec<Bar>) -> Result<Self, BarError> {
        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(BarError::InvalidPrices { date: bar.date });
            }
            if i > 0 {
                let previous = bars[i - 1].date;
                if bar.date == previous {
                    return Err(BarError::DuplicateDate { date: bar.date });
                }
                if bar.date < previous {
                    return Err(BarError::Unsorted {
                        index: i,
                        date: bar.date,
                        previous,
                    });
                }
            }
        }
        Ok(Self { bars })
    }

    /// Sort by date first, then validate. Used by adapters whose source order is unknown.
    pub fn from_unsorted(mut bars: Vec<Bar>) -> Result<Self, BarError> {
        bars.sort_by_key(|b| b.date);
        Self::new(bars)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Bars from the start of the series up to and including `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn history(&self, index: usize) -> &[Bar] {
        &self.bars[..=index]
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Calendar days between the first and last bar (0 for fewer than two bars).
    pub fn elapsed_days(&self) -> i64 {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => (last.date - first.date).num_days(),
            _ => 0,
        }
    }

    /// Deterministic BLAKE3 hash over every date and OHLCV value.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for bar in &self.bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

impl<'de> Deserialize<'de> for BarSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bars = Vec::<Bar>::deserialize(deserializer)?;
        BarSeries::new(bars).map_err(serde::de::Error::custom)
    }
}
