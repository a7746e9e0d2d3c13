//! Fair Value Gap detection and lifecycle tracking.
//!
//! An FVG is a three-candle price imbalance. For the window (prev, cur, next):
//! - Bullish: `close[cur] > low[prev]` and `high[next] < low[prev]` — the gap
//!   spans from `high[next]` up to `low[prev]`.
//! - Bearish: `close[cur] < high[prev]` and `low[next] > high[prev]` — the gap
//!   spans from `high[prev]` up to `low[next]`.
//!
//! The tracker keeps every detected gap active until price either fills it
//! (retraces into the range from the correct side) or invalidates it (breaches
//! a boundary). Both transitions are terminal: a gap leaves the active set
//! permanently and never returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CandleSeries;

/// A detected Fair Value Gap.
///
/// `high` is always the upper boundary of the gap range and `low` the lower,
/// for both directions. `timestamp` is the middle candle of the pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fvg {
    pub high: f64,
    pub low: f64,
    pub timestamp: DateTime<Utc>,
    pub is_bullish: bool,
    pub filled: bool,
    pub invalidated: bool,
}

impl Fvg {
    fn new(high: f64, low: f64, timestamp: DateTime<Utc>, is_bullish: bool) -> Self {
        Self {
            high,
            low,
            timestamp,
            is_bullish,
            filled: false,
            invalidated: false,
        }
    }
}

/// Tracks active and filled FVGs, in insertion order.
///
/// Invalidated gaps are dropped outright; filled gaps move to the archive.
/// The fill check runs before the invalidation check on every update pass, so
/// a single gap is never both filled and invalidated.
#[derive(Debug, Clone, Default)]
pub struct FvgTracker {
    active: Vec<Fvg>,
    filled: Vec<Fvg>,
}

impl FvgTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[Fvg] {
        &self.active
    }

    pub fn filled(&self) -> &[Fvg] {
        &self.filled
    }

    /// Scan a series for three-candle gap patterns.
    ///
    /// Every interior index is a candidate middle candle. The bullish and
    /// bearish conditions are tested independently — if both ever held at one
    /// index, both gaps would be emitted. (With sane candles the conditions
    /// are mutually exclusive, but that is a property of the data, not an
    /// enforced rule.)
    pub fn detect(series: &CandleSeries) -> Vec<Fvg> {
        let candles = series.candles();
        let mut found = Vec::new();
        if candles.len() < 3 {
            return found;
        }

        for i in 1..candles.len() - 1 {
            let prev = &candles[i - 1];
            let cur = &candles[i];
            let next = &candles[i + 1];

            if cur.close > prev.low && next.high < prev.low {
                found.push(Fvg::new(prev.low, next.high, cur.timestamp, true));
            }
            if cur.close < prev.high && next.low > prev.high {
                found.push(Fvg::new(next.low, prev.high, cur.timestamp, false));
            }
        }
        found
    }

    /// Detect gaps in `series` and append them to the active set.
    pub fn ingest(&mut self, series: &CandleSeries) {
        self.active.extend(Self::detect(series));
    }

    /// Update fill/invalidation status of every active gap against the
    /// latest price action.
    ///
    /// The active set is drained and rebuilt from survivors, so removal never
    /// skips or reprocesses an element. Per gap, in order:
    /// 1. Fill: bullish fills when `price <= low`, bearish when `price >= high`
    ///    — the gap moves to the filled archive.
    /// 2. Invalidation: either boundary breached (`high > gap.high` or
    ///    `low < gap.low`, same test for both directions) — the gap is dropped.
    pub fn update_status(&mut self, price: f64, high: f64, low: f64) {
        let snapshot = std::mem::take(&mut self.active);
        for mut fvg in snapshot {
            let fill_hit = if fvg.is_bullish {
                price <= fvg.low
            } else {
                price >= fvg.high
            };
            if !fvg.filled && fill_hit {
                fvg.filled = true;
                self.filled.push(fvg);
                continue;
            }

            if high > fvg.high || low < fvg.low {
                // Invalidated: dropped outright, not archived, so the flag on
                // the struct is never set in-core.
                continue;
            }

            self.active.push(fvg);
        }
    }
}
