//! Deviation-line search — finds the entry line and paired stop-loss.
//!
//! The setup is a three-candle confluence scanned backward from the most
//! recent candle:
//! 1. A candle `i` whose low dipped below its EMA (the deviation),
//! 2. the first bullish candle `j` before it (its high is the entry line),
//! 3. the first bearish candle `k` at or before `j` (its low is the stop).
//!
//! The search is greedy: the first full (i, j, k) triple wins. When the inner
//! legs fail for one `i`, the outer scan continues to earlier candles.

use serde::{Deserialize, Serialize};

use crate::domain::CandleSeries;
use crate::indicators::ema;

/// EMA window the deviation test runs against.
pub const DEFAULT_EMA_WINDOW: usize = 21;

/// How far back the outer scan looks for the deviation candle.
const SCAN_LOOKBACK: usize = 20;

/// How far back each inner leg looks for its push/pullback candle.
const LEG_LOOKBACK: usize = 10;

/// Entry line and paired stop-loss produced by a successful search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviationLevels {
    /// High of the bullish push candle — price must reclaim above this line.
    pub entry_line: f64,
    /// Low of the bearish pullback candle preceding the push.
    pub stop_loss: f64,
}

/// Search the series backward for a deviation line and stop-loss.
///
/// Returns `None` when no (i, j, k) triple satisfies all three conditions
/// within the bounded windows — callers treat that as "no setup this tick".
/// All three scans use exclusive lower bounds, so index 0 is never a
/// deviation candidate and each leg inspects at most `lookback - 1` candles.
pub fn find_deviation_line(series: &CandleSeries, ema_window: usize) -> Option<DeviationLevels> {
    let candles = series.candles();
    let n = candles.len();
    if n < 2 {
        return None;
    }

    let ema_line = ema(&series.closes(), ema_window);

    let i_floor = n.saturating_sub(SCAN_LOOKBACK);
    for i in (i_floor + 1..n).rev() {
        // Written as a negated `<` so a NaN EMA (zero window) never matches.
        if !(candles[i].low < ema_line[i]) {
            continue;
        }

        let j_floor = i.saturating_sub(LEG_LOOKBACK);
        for j in (j_floor + 1..i).rev() {
            if !candles[j].is_bullish() {
                continue;
            }

            let k_floor = j.saturating_sub(LEG_LOOKBACK);
            for k in (k_floor + 1..=j).rev() {
                if candles[k].is_bearish() {
                    return Some(DeviationLevels {
                        entry_line: candles[j].high,
                        stop_loss: candles[k].low,
                    });
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candle, CandleSeries, Timeframe};
    use chrono::{Duration, TimeZone, Utc};

    fn candle(i: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        Candle {
            timestamp: base + Duration::minutes(5 * i),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        }
    }

    /// Flat filler: close == open, so neither bullish nor bearish.
    fn filler(i: i64, price: f64) -> Candle {
        candle(i, price, price + 0.5, price - 0.5, price)
    }

    fn setup_series() -> CandleSeries {
        // Fillers hold the EMA near 98, then:
        //   idx 6: bearish pullback (low 95 — the stop),
        //   idx 7: bullish push (high 100 — the entry line),
        //   idx 8: deviation candle (low 94, well under EMA),
        //   idx 9: latest candle, back above the line.
        let mut candles: Vec<Candle> = (0..6).map(|i| filler(i, 98.0)).collect();
        candles.push(candle(6, 99.0, 99.5, 95.0, 96.0));
        candles.push(candle(7, 96.0, 100.0, 95.5, 99.5));
        candles.push(candle(8, 96.0, 96.5, 94.0, 95.0));
        candles.push(candle(9, 100.5, 101.5, 100.2, 101.0));
        CandleSeries::new(Timeframe::M5, candles).unwrap()
    }

    #[test]
    fn finds_push_high_and_pullback_low() {
        let levels = find_deviation_line(&setup_series(), DEFAULT_EMA_WINDOW).unwrap();
        assert_eq!(levels.entry_line, 100.0);
        assert_eq!(levels.stop_loss, 95.0);
    }

    #[test]
    fn no_dip_below_ema_returns_none() {
        // Lows never undercut the EMA of a flat series.
        let candles: Vec<Candle> = (0..30)
            .map(|i| candle(i, 100.0, 101.0, 99.9, 100.0))
            .collect();
        let series = CandleSeries::new(Timeframe::M5, candles).unwrap();
        assert!(find_deviation_line(&series, DEFAULT_EMA_WINDOW).is_none());
    }

    #[test]
    fn dip_without_bullish_push_returns_none() {
        // A deviation candle exists but every earlier candle is flat.
        let mut candles: Vec<Candle> = (0..8).map(|i| filler(i, 98.0)).collect();
        candles.push(candle(8, 96.0, 96.5, 90.0, 95.0));
        let series = CandleSeries::new(Timeframe::M5, candles).unwrap();
        assert!(find_deviation_line(&series, DEFAULT_EMA_WINDOW).is_none());
    }

    #[test]
    fn push_without_bearish_pullback_returns_none() {
        // Bullish push present, but no bearish candle within the k-leg.
        let mut candles: Vec<Candle> = (0..6).map(|i| filler(i, 98.0)).collect();
        candles.push(candle(6, 96.0, 100.0, 95.5, 99.5)); // bullish push
        candles.push(candle(7, 96.0, 96.5, 94.0, 95.5)); // deviation dip
        candles.push(filler(8, 98.0));
        let series = CandleSeries::new(Timeframe::M5, candles).unwrap();
        // The dip candle at 7 is itself bearish, but the k-leg only scans at
        // or before the push candle. No bearish candle precedes the push, so
        // every (i, j) pairing fails.
        assert!(find_deviation_line(&series, DEFAULT_EMA_WINDOW).is_none());
    }

    #[test]
    fn short_series_returns_none() {
        let series = CandleSeries::new(Timeframe::M5, vec![filler(0, 100.0)]).unwrap();
        assert!(find_deviation_line(&series, DEFAULT_EMA_WINDOW).is_none());
    }

    #[test]
    fn outer_scan_skips_index_zero() {
        // Only candle 0 dips below the EMA; the exclusive lower bound means
        // it is never tested as a deviation candidate.
        let mut candles = vec![candle(0, 100.0, 100.5, 80.0, 99.0)];
        candles.extend((1..5).map(|i| filler(i, 100.0)));
        let series = CandleSeries::new(Timeframe::M5, candles).unwrap();
        assert!(find_deviation_line(&series, DEFAULT_EMA_WINDOW).is_none());
    }
}
