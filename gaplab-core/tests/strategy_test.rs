//! End-to-end pipeline scenarios: confluence entry, exit routing, and the
//! single-trade invariant across ticks.

use chrono::{DateTime, Duration, TimeZone, Utc};
use gaplab_core::domain::{Candle, CandleSeries, ExitReason, Timeframe, TradeDirection};
use gaplab_core::strategy::FvgStrategy;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()
}

fn candle(tf_minutes: i64, i: i64, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle {
        timestamp: base_time() + Duration::minutes(tf_minutes * i),
        open,
        high,
        low,
        close,
        volume: 1000.0,
    }
}

/// 10m series: flat history, then a candle that opens above both EMAs and
/// closes below them (the crossunder), then a final close at 101.
fn crossunder_10m() -> CandleSeries {
    let mut candles: Vec<Candle> = (0..10)
        .map(|i| candle(10, i, 100.0, 100.5, 99.5, 100.0))
        .collect();
    candles.push(candle(10, 10, 105.0, 106.0, 94.0, 95.0));
    candles.push(candle(10, 11, 95.0, 101.5, 94.5, 101.0));
    CandleSeries::new(Timeframe::M10, candles).unwrap()
}

/// 5m series: bearish pullback (low 95), bullish push (high 100), deviation
/// dip under the EMA, then a reclaim close at 101.
fn reclaim_5m() -> CandleSeries {
    let mut candles: Vec<Candle> = (0..6)
        .map(|i| candle(5, i, 98.0, 98.5, 97.5, 98.0))
        .collect();
    candles.push(candle(5, 6, 99.0, 99.5, 95.0, 96.0));
    candles.push(candle(5, 7, 96.0, 100.0, 95.5, 99.5));
    candles.push(candle(5, 8, 96.0, 96.5, 94.0, 95.0));
    candles.push(candle(5, 9, 100.5, 101.5, 100.2, 101.0));
    CandleSeries::new(Timeframe::M5, candles).unwrap()
}

/// Fewer than 50 30-minute candles: always continuation regime.
fn short_30m() -> CandleSeries {
    let candles: Vec<Candle> = (0..20)
        .map(|i| candle(30, i, 100.0, 100.5, 99.5, 100.0))
        .collect();
    CandleSeries::new(Timeframe::M30, candles).unwrap()
}

#[test]
fn confluence_emits_long_with_continuation_target() {
    let mut strategy = FvgStrategy::default();
    let signal = strategy
        .process(&crossunder_10m(), &reclaim_5m(), Some(&short_30m()))
        .unwrap()
        .expect("full confluence must emit a signal");

    assert_eq!(signal.direction, TradeDirection::Long);
    assert_eq!(signal.entry, 101.0);
    assert_eq!(signal.stop_loss, 95.0);
    assert!((signal.take_profit - 102.01).abs() < 1e-9);
    assert_eq!(signal.dev_line, Some(100.0));
    assert_eq!(signal.timestamp, reclaim_5m().last().unwrap().timestamp);
}

#[test]
fn no_second_signal_while_trade_is_open() {
    let mut strategy = FvgStrategy::default();
    let first = strategy
        .process(&crossunder_10m(), &reclaim_5m(), None)
        .unwrap();
    assert!(first.is_some());

    // Identical confluence on the next tick: rejected while the slot is held.
    let second = strategy
        .process(&crossunder_10m(), &reclaim_5m(), None)
        .unwrap();
    assert!(second.is_none());
    assert!(strategy.lifecycle().has_active());
}

#[test]
fn stop_loss_exit_reopens_the_slot() {
    let mut strategy = FvgStrategy::default();
    strategy
        .process(&crossunder_10m(), &reclaim_5m(), None)
        .unwrap()
        .expect("entry");

    // A candle spanning both levels: SL priority.
    let spanning = candle(5, 10, 100.0, 106.0, 94.0, 96.0);
    let event = strategy.check_exit(&spanning).expect("exit");
    assert_eq!(event.reason, ExitReason::StopLoss);
    assert_eq!(event.exit_price, 95.0);
    assert_eq!(event.reason.to_string(), "SL");

    assert!(!strategy.lifecycle().has_active());
    assert_eq!(strategy.lifecycle().closed().len(), 1);

    // The slot is free again: the same confluence re-arms.
    let next = strategy
        .process(&crossunder_10m(), &reclaim_5m(), None)
        .unwrap();
    assert!(next.is_some());
}

#[test]
fn gap_state_is_tracked_alongside_entries() {
    // Splice a bullish FVG pattern into the 10m history and confirm the
    // tracker carries it while the entry pipeline runs independently.
    let mut candles: Vec<Candle> = (0..4)
        .map(|i| candle(10, i, 100.0, 100.5, 99.5, 100.0))
        .collect();
    // prev.low = 99.5, cur.close = 101 > 99.5, next.high = 90 < 99.5.
    candles.push(candle(10, 4, 100.0, 101.5, 99.8, 101.0));
    candles.push(candle(10, 5, 89.0, 90.0, 85.0, 88.0));
    candles.push(candle(10, 6, 88.0, 92.0, 87.0, 91.0));
    let tens = CandleSeries::new(Timeframe::M10, candles).unwrap();
    let fives = CandleSeries::new(
        Timeframe::M5,
        vec![candle(5, 0, 95.0, 96.0, 94.0, 95.5)],
    )
    .unwrap();

    let mut strategy = FvgStrategy::default();
    let signal = strategy.process(&tens, &fives, None).unwrap();
    assert!(signal.is_none());
    // The bullish gap at [90, 99.5] survived the 5m candle (no fill at 95.5,
    // no boundary breach from high 96 / low 94).
    assert_eq!(strategy.tracker().active().len(), 1);
    let gap = &strategy.tracker().active()[0];
    assert!(gap.is_bullish);
    assert_eq!(gap.high, 99.5);
    assert_eq!(gap.low, 90.0);
}
