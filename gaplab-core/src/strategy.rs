//! Strategy session — wires the tracker, evaluator, and lifecycle together.
//!
//! One `FvgStrategy` instance is one trading session: it owns the FVG tracker
//! state and the single-trade lifecycle explicitly (no ambient singletons),
//! and a single logical driver — backtest replay or live poller — calls it
//! sequentially, once per processing tick.

use crate::domain::{Candle, CandleSeries, SignalError, TradeSignal};
use crate::entry::{EntryConfig, EntryEvaluator};
use crate::fvg::FvgTracker;
use crate::lifecycle::{ExitEvent, SignalLifecycle};

/// The full signal-generation pipeline for one session.
#[derive(Debug, Clone)]
pub struct FvgStrategy {
    evaluator: EntryEvaluator,
    tracker: FvgTracker,
    lifecycle: SignalLifecycle,
}

impl FvgStrategy {
    pub fn new(config: EntryConfig) -> Self {
        Self {
            evaluator: EntryEvaluator::new(config),
            tracker: FvgTracker::new(),
            lifecycle: SignalLifecycle::new(),
        }
    }

    /// Gap state for inspection. Tracked every tick but not consulted by the
    /// entry decision.
    pub fn tracker(&self) -> &FvgTracker {
        &self.tracker
    }

    pub fn lifecycle(&self) -> &SignalLifecycle {
        &self.lifecycle
    }

    /// One processing tick.
    ///
    /// Updates gap state from the 10m series and the latest 5m candle, then
    /// evaluates entry conditions if no trade is open. An empty 10m or 5m
    /// series skips the tick entirely — tracker and lifecycle state stay
    /// untouched, and the caller retries next tick.
    pub fn process(
        &mut self,
        series_10m: &CandleSeries,
        series_5m: &CandleSeries,
        series_30m: Option<&CandleSeries>,
    ) -> Result<Option<TradeSignal>, SignalError> {
        let Some(last_5m) = series_5m.last() else {
            return Ok(None);
        };
        if series_10m.is_empty() {
            return Ok(None);
        }

        self.tracker.ingest(series_10m);
        self.tracker
            .update_status(last_5m.close, last_5m.high, last_5m.low);

        if self.lifecycle.has_active() {
            return Ok(None);
        }
        let Some(params) = self.evaluator.evaluate(series_10m, series_5m, series_30m) else {
            return Ok(None);
        };
        self.lifecycle.create(params)
    }

    /// Route a subsequent candle into the exit check of the open signal.
    pub fn check_exit(&mut self, candle: &Candle) -> Option<ExitEvent> {
        self.lifecycle.check_exit(candle)
    }
}

impl Default for FvgStrategy {
    fn default() -> Self {
        Self::new(EntryConfig::default())
    }
}
