//! Market-data collaborator: the trait the orchestrator fetches bars through,
//! plus in-memory, CSV and synthetic adapters.
//!
//! Retrieval, caching and retries belong to the data source. The orchestrator
//! only asks for one ticker over an inclusive date range, once per backtest.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use barlab_core::domain::{Bar, BarError};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Failures of a market-data source.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid bar series for '{ticker}': {source}")]
    InvalidSeries {
        ticker: String,
        #[source]
        source: BarError,
    },
}

/// A source of daily bars.
///
/// `fetch` returns bars dated within `[start, end]` (both inclusive). An
/// unknown ticker or an empty range is an empty vector, not an error.
pub trait MarketData: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>, DataError>;
}

fn in_range(bar: &Bar, start: NaiveDate, end: NaiveDate) -> bool {
    bar.date >= start && bar.date <= end
}

// ─── In-memory ──────────────────────────────────────────────────────

/// Bars held in memory, keyed by upper-case ticker.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketData {
    bars: HashMap<String, Vec<Bar>>,
}

impl InMemoryMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: &str, bars: Vec<Bar>) {
        self.bars.insert(ticker.trim().to_ascii_uppercase(), bars);
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.insert(ticker, bars);
        self
    }
}

impl MarketData for InMemoryMarketData {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>, DataError> {
        let key = ticker.trim().to_ascii_uppercase();
        Ok(self
            .bars
            .get(&key)
            .map(|bars| {
                bars.iter()
                    .filter(|b| in_range(b, start, end))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ─── CSV directory ──────────────────────────────────────────────────

/// Reads `<dir>/<TICKER>.csv` with a `date,open,high,low,close,volume` header.
///
/// A missing file is an empty series. Extra columns are ignored.
#[derive(Debug, Clone)]
pub struct CsvMarketData {
    dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

impl From<CsvRow> for Bar {
    fn from(row: CsvRow) -> Self {
        Bar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume.max(0.0).round() as u64,
        }
    }
}

impl CsvMarketData {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir
            .join(format!("{}.csv", ticker.trim().to_ascii_uppercase()))
    }
}

impl MarketData for CsvMarketData {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(ticker);
        if !path.exists() {
            debug!(path = %path.display(), "no CSV for ticker");
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|source| DataError::Csv {
                path: path.clone(),
                source,
            })?;

        let mut bars = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|source| DataError::Csv {
                path: path.clone(),
                source,
            })?;
            let bar = Bar::from(row);
            if in_range(&bar, start, end) {
                bars.push(bar);
            }
        }
        debug!(path = %path.display(), bars = bars.len(), "loaded CSV");
        Ok(bars)
    }
}

// ─── Synthetic ──────────────────────────────────────────────────────

/// Deterministic random-walk bars for demos.
///
/// The RNG is seeded from the BLAKE3 hash of the ticker, so a ticker always
/// produces the same walk. Weekends are skipped. The walk always starts at
/// `start` with `start_price`, so different ranges give different series.
#[derive(Debug, Clone)]
pub struct SyntheticMarketData {
    start_price: f64,
}

impl Default for SyntheticMarketData {
    fn default() -> Self {
        Self { start_price: 100.0 }
    }
}

impl SyntheticMarketData {
    pub fn new(start_price: f64) -> Self {
        Self { start_price }
    }
}

impl MarketData for SyntheticMarketData {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>, DataError> {
        Ok(generate_synthetic_bars(
            &ticker.trim().to_ascii_uppercase(),
            start,
            end,
            self.start_price,
        ))
    }
}

fn generate_synthetic_bars(ticker: &str, start: NaiveDate, end: NaiveDate, start_price: f64) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = start_price;
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(Bar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}
