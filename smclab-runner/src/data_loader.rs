//! CSV candle loading.
//!
//! Expected header: `timestamp,open,high,low,close,volume`. The timestamp column
//! accepts either epoch milliseconds or an RFC 3339 string. Rows are taken in file
//! order; `limit` keeps only the trailing rows before the window is validated.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use smclab_core::{CandleError, CandleWindow, RawCandle};
use thiserror::Error;
use tracing::debug;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read candles from {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: unrecognized timestamp '{value}' (expected epoch milliseconds or RFC 3339)")]
    Timestamp { row: usize, value: String },

    #[error("invalid candle data: {0}")]
    Candle(#[from] CandleError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOptions {
    /// Keep only the last N rows.
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Load and validate a candle window from a CSV file.
pub fn load_candles(path: &Path, opts: &LoadOptions) -> Result<CandleWindow, LoadError> {
    let source_name = path.display().to_string();
    let reader = csv::Reader::from_path(path).map_err(|source| LoadError::Csv {
        source_name: source_name.clone(),
        source,
    })?;
    read_rows(reader, &source_name, opts)
}

/// Load and validate a candle window from any CSV byte stream.
pub fn read_candles<R: Read>(input: R, opts: &LoadOptions) -> Result<CandleWindow, LoadError> {
    read_rows(csv::Reader::from_reader(input), "<reader>", opts)
}

fn read_rows<R: Read>(
    mut reader: csv::Reader<R>,
    source_name: &str,
    opts: &LoadOptions,
) -> Result<CandleWindow, LoadError> {
    let mut raw = Vec::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|source| LoadError::Csv {
            source_name: source_name.to_string(),
            source,
        })?;
        // Row numbers are 1-based data rows, not counting the header.
        let timestamp = parse_timestamp(row.timestamp.trim()).ok_or_else(|| {
            LoadError::Timestamp {
                row: i + 1,
                value: row.timestamp.clone(),
            }
        })?;
        raw.push(RawCandle {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    let total = raw.len();
    if let Some(limit) = opts.limit {
        raw.drain(..total.saturating_sub(limit));
    }

    let window = CandleWindow::new(raw)?;
    debug!(source = source_name, rows = total, kept = window.len(), "loaded candles");
    Ok(window)
}

/// Epoch milliseconds (all digits, optional sign) or RFC 3339.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let millis: i64 = value.parse().ok()?;
        return Utc.timestamp_millis_opt(millis).single();
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Symbol name for a CSV path: its file stem.
pub fn symbol_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
