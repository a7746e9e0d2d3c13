//! Domain types — candles, time-indexed series, and trade signals.

pub mod candle;
pub mod signal;

pub use candle::{Candle, CandleSeries, SeriesError, Timeframe};
pub use signal::{
    ExitReason, SignalError, SignalParams, TradeDirection, TradeSignal, TradeStatus,
};

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLCV: open = prev close (or close for the first
/// candle), high = max(open, close) + 1.0, low = min(open, close) - 1.0,
/// volume = 1000. Timestamps are one minute apart.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    use chrono::{Duration, TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base + Duration::minutes(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}
