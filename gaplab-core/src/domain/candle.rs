//! Candle — the fundamental market data unit — and its time-indexed series.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV candle for a single symbol on a single timeframe bucket.
///
/// Immutable once produced. The timestamp marks the bucket open time;
/// series are ordered by timestamp ascending, one series per timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Basic OHLCV sanity check: high >= low, high bounds open/close, etc.
    /// NaN in any price field fails every comparison and reports insane.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }

    /// Close above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Fixed intraday timeframes consumed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M5,
    M10,
    M30,
}

impl Timeframe {
    pub fn minutes(&self) -> i64 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M10 => 10,
            Timeframe::M30 => 30,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M10 => "10m",
            Timeframe::M30 => "30m",
        }
    }
}

/// Errors from series construction.
///
/// These signal malformed collaborator input, not "nothing found" outcomes.
/// The latter are `None` throughout the core.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("candle {index} is out of order: timestamps must be strictly ascending")]
    OutOfOrder { index: usize },

    #[error("candle {index} has invalid OHLCV values")]
    InvalidCandle { index: usize },
}

/// Ordered, time-ascending candle sequence for one timeframe.
///
/// Construction validates ordering and per-candle sanity, so every algorithm
/// downstream can assume a well-formed series and reserve `None` strictly for
/// "insufficient data".
#[derive(Debug, Clone)]
pub struct CandleSeries {
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a validated series. Candles must be sane and strictly ascending.
    pub fn new(timeframe: Timeframe, candles: Vec<Candle>) -> Result<Self, SeriesError> {
        for (index, candle) in candles.iter().enumerate() {
            if !candle.is_sane() {
                return Err(SeriesError::InvalidCandle { index });
            }
            if index > 0 && candles[index - 1].timestamp >= candle.timestamp {
                return Err(SeriesError::OutOfOrder { index });
            }
        }
        Ok(Self { timeframe, candles })
    }

    pub fn empty(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            candles: Vec::new(),
        }
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Close prices in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// The trailing `max_len` candles as a new series.
    ///
    /// A sub-slice of a validated series is already ordered and sane, so no
    /// revalidation happens here.
    pub fn tail(&self, max_len: usize) -> CandleSeries {
        let start = self.candles.len().saturating_sub(max_len);
        Self {
            timeframe: self.timeframe,
            candles: self.candles[start..].to_vec(),
        }
    }
}
