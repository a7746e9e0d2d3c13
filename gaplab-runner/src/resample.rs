//! Timeframe resampling — buckets base candles into coarser timeframes.
//!
//! A bucket aggregates every base candle whose timestamp floors to the same
//! bucket open: open = first, high = max, low = min, close = last,
//! volume = sum. The trailing bucket is in-progress until a base candle from
//! the next bucket arrives, matching what a live kline feed reports.

use chrono::{DateTime, TimeZone, Utc};
use gaplab_core::domain::{Candle, CandleSeries, SeriesError, Timeframe};

/// Floor a timestamp to its bucket open for the given timeframe.
fn bucket_open(timestamp: DateTime<Utc>, timeframe: Timeframe) -> DateTime<Utc> {
    let secs = timestamp.timestamp();
    let bucket_secs = timeframe.minutes() * 60;
    let floored = secs - secs.rem_euclid(bucket_secs);
    Utc.timestamp_opt(floored, 0).single().unwrap_or(timestamp)
}

/// Incrementally folds base candles into one coarser timeframe.
///
/// The replay loop pushes one base candle at a time and reads the rolling
/// window back out; the last candle is the in-progress bucket.
#[derive(Debug, Clone)]
pub struct TimeframeAggregator {
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl TimeframeAggregator {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            candles: Vec::new(),
        }
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Fold one base candle into the current bucket, or open a new one.
    pub fn push(&mut self, base: &Candle) {
        let open_time = bucket_open(base.timestamp, self.timeframe);
        match self.candles.last_mut() {
            Some(current) if current.timestamp == open_time => {
                current.high = current.high.max(base.high);
                current.low = current.low.min(base.low);
                current.close = base.close;
                current.volume += base.volume;
            }
            _ => self.candles.push(Candle {
                timestamp: open_time,
                open: base.open,
                high: base.high,
                low: base.low,
                close: base.close,
                volume: base.volume,
            }),
        }
    }

    /// The trailing `max_len` aggregated candles as a validated series.
    pub fn window(&self, max_len: usize) -> Result<CandleSeries, SeriesError> {
        let start = self.candles.len().saturating_sub(max_len);
        CandleSeries::new(self.timeframe, self.candles[start..].to_vec())
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}

/// Resample a whole base series into a coarser timeframe in one pass.
pub fn resample(base: &CandleSeries, timeframe: Timeframe) -> Result<CandleSeries, SeriesError> {
    let mut aggregator = TimeframeAggregator::new(timeframe);
    for candle in base.candles() {
        aggregator.push(candle);
    }
    aggregator.window(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn minute_candles(count: usize) -> Vec<Candle> {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        (0..count)
            .map(|i| Candle {
                timestamp: base + Duration::minutes(i as i64),
                open: 100.0 + i as f64,
                high: 101.0 + i as f64,
                low: 99.0 + i as f64,
                close: 100.5 + i as f64,
                volume: 10.0,
            })
            .collect()
    }

    #[test]
    fn five_minute_buckets_aggregate_ohlcv() {
        let base = CandleSeries::new(Timeframe::M1, minute_candles(10)).unwrap();
        let resampled = resample(&base, Timeframe::M5).unwrap();
        assert_eq!(resampled.len(), 2);

        let first = &resampled.candles()[0];
        assert_eq!(first.open, 100.0); // first minute's open
        assert_eq!(first.high, 105.0); // max of minutes 0..=4
        assert_eq!(first.low, 99.0); // min of minutes 0..=4
        assert_eq!(first.close, 104.5); // last minute's close
        assert_eq!(first.volume, 50.0);
        assert_eq!(
            first.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn partial_trailing_bucket_is_included() {
        let base = CandleSeries::new(Timeframe::M1, minute_candles(7)).unwrap();
        let resampled = resample(&base, Timeframe::M5).unwrap();
        // Minutes 5 and 6 form an in-progress second bucket.
        assert_eq!(resampled.len(), 2);
        let partial = &resampled.candles()[1];
        assert_eq!(partial.open, 105.0);
        assert_eq!(partial.close, 106.5);
        assert_eq!(partial.volume, 20.0);
    }

    #[test]
    fn aggregator_updates_bucket_incrementally() {
        let candles = minute_candles(6);
        let mut aggregator = TimeframeAggregator::new(Timeframe::M5);
        for candle in &candles[..3] {
            aggregator.push(candle);
        }
        assert_eq!(aggregator.len(), 1);
        let window = aggregator.window(10).unwrap();
        assert_eq!(window.candles()[0].close, 102.5);

        for candle in &candles[3..] {
            aggregator.push(candle);
        }
        assert_eq!(aggregator.len(), 2);
    }

    #[test]
    fn window_caps_the_series_length() {
        let base = CandleSeries::new(Timeframe::M1, minute_candles(60)).unwrap();
        let mut aggregator = TimeframeAggregator::new(Timeframe::M10);
        for candle in base.candles() {
            aggregator.push(candle);
        }
        assert_eq!(aggregator.len(), 6);
        let window = aggregator.window(2).unwrap();
        assert_eq!(window.len(), 2);
        // The window keeps the most recent buckets.
        assert_eq!(
            window.candles()[1].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 50, 0).unwrap()
        );
    }

    #[test]
    fn thirty_minute_bucket_open_floors_correctly() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 9, 47, 0).unwrap();
        assert_eq!(
            bucket_open(t, Timeframe::M30),
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap()
        );
    }
}
