//! The replay loop — drives the core strategy over a historical base series.
//!
//! Per closed base candle, the loop:
//! 1. folds the candle into the 5/10/30-minute aggregators,
//! 2. routes it into the exit check of any open signal,
//! 3. hands the rolling multi-timeframe windows to `FvgStrategy::process`.
//!
//! This mirrors what a live polling driver does, so a signal seen in replay
//! is a signal the live loop would have seen at the same candle.

use gaplab_core::domain::{CandleSeries, SeriesError, SignalError, Timeframe, TradeDirection, TradeSignal};
use gaplab_core::strategy::FvgStrategy;
use thiserror::Error;

use crate::config::BacktestConfig;
use crate::metrics::PerformanceMetrics;
use crate::resample::TimeframeAggregator;
use crate::result::{BacktestResult, EquityPoint, TradeRecord};

/// Rolling window caps, matching what a live data fetch would request.
const WINDOW_10M: usize = 200;
const WINDOW_5M: usize = 200;
const WINDOW_30M: usize = 100;

/// Errors from the replay loop.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("window construction failed: {0}")]
    Series(#[from] SeriesError),

    #[error("signal construction failed: {0}")]
    Signal(#[from] SignalError),
}

/// Open signal plus the position size committed to it.
struct OpenPosition {
    signal: TradeSignal,
    quantity: f64,
}

/// Run the full backtest over a base 1-minute series.
pub fn run_backtest(
    config: &BacktestConfig,
    base: &CandleSeries,
) -> Result<BacktestResult, ReplayError> {
    let mut strategy = FvgStrategy::new(config.strategy.entry_config());
    let mut agg_5m = TimeframeAggregator::new(Timeframe::M5);
    let mut agg_10m = TimeframeAggregator::new(Timeframe::M10);
    let mut agg_30m = TimeframeAggregator::new(Timeframe::M30);

    let mut equity = config.initial_capital;
    let mut equity_curve = Vec::with_capacity(base.len());
    let mut trades = Vec::new();
    let mut open: Option<OpenPosition> = None;

    for candle in base.candles() {
        agg_5m.push(candle);
        agg_10m.push(candle);
        agg_30m.push(candle);

        // Exit first: a signal created on an earlier candle may close here.
        if let Some(event) = strategy.check_exit(candle) {
            if let Some(position) = open.take() {
                let sign = match position.signal.direction {
                    TradeDirection::Long => 1.0,
                    TradeDirection::Short => -1.0,
                };
                let pnl = sign * (event.exit_price - position.signal.entry) * position.quantity;
                equity += pnl;
                trades.push(TradeRecord {
                    symbol: config.symbol.clone(),
                    direction: position.signal.direction,
                    entry_time: position.signal.timestamp,
                    exit_time: candle.timestamp,
                    entry_price: position.signal.entry,
                    exit_price: event.exit_price,
                    quantity: position.quantity,
                    pnl,
                    return_pct: sign * (event.exit_price / position.signal.entry - 1.0),
                    exit_reason: event.reason,
                    dev_line: position.signal.dev_line,
                });
            }
        }

        let window_10m = agg_10m.window(WINDOW_10M)?;
        let window_5m = agg_5m.window(WINDOW_5M)?;
        let window_30m = agg_30m.window(WINDOW_30M)?;
        if let Some(signal) = strategy.process(&window_10m, &window_5m, Some(&window_30m))? {
            let quantity = equity * config.stake_fraction / signal.entry;
            open = Some(OpenPosition { signal, quantity });
        }

        equity_curve.push(EquityPoint {
            timestamp: candle.timestamp,
            equity,
        });
    }

    let equity_values: Vec<f64> = equity_curve.iter().map(|p| p.equity).collect();
    let metrics = PerformanceMetrics::compute(&equity_values, &trades, config.initial_capital);

    Ok(BacktestResult {
        run_id: config.run_id(),
        symbol: config.symbol.clone(),
        equity_curve,
        trades,
        metrics,
        open_signal: strategy.lifecycle().active().cloned(),
    })
}
