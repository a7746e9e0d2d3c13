//! CSV loading for historical OHLCV data.
//!
//! Expected columns: `timestamp,open,high,low,close,volume` with the
//! timestamp in epoch milliseconds — the shape exchange kline exports
//! typically have. Rows must already be oldest-first; the series constructor
//! rejects anything out of order.

use chrono::{TimeZone, Utc};
use gaplab_core::domain::{Candle, CandleSeries, SeriesError, Timeframe};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open CSV file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse CSV row: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: timestamp {timestamp_ms} ms is not a valid instant")]
    BadTimestamp { row: usize, timestamp_ms: i64 },

    #[error("CSV contained no rows")]
    Empty,

    #[error("malformed candle series: {0}")]
    Series(#[from] SeriesError),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Load a base 1-minute candle series from a CSV file.
pub fn load_csv(path: &Path) -> Result<CandleSeries, DataError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut candles = Vec::new();

    for (row, record) in reader.deserialize::<CsvRow>().enumerate() {
        let record = record?;
        let timestamp = Utc
            .timestamp_millis_opt(record.timestamp)
            .single()
            .ok_or(DataError::BadTimestamp {
                row,
                timestamp_ms: record.timestamp,
            })?;
        candles.push(Candle {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        });
    }

    if candles.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(CandleSeries::new(Timeframe::M1, candles)?)
}
