//! Entry evaluation — combines the crossunder filter, deviation line, and
//! regime classification into a long setup.
//!
//! The evaluator is long-only: a bearish 10-minute crossunder followed by a
//! 5-minute reclaim above the deviation line is read as a spring, and the
//! 30-minute regime only decides how far the target sits.

use serde::{Deserialize, Serialize};

use crate::deviation::find_deviation_line;
use crate::domain::{CandleSeries, SignalParams, TradeDirection};
use crate::indicators::{ema, sma};

/// Tunable parameters for the entry evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Fast EMA window on the 10-minute series.
    pub fast_ema: usize,
    /// Slow EMA window on the 10-minute series; also the deviation-search EMA.
    pub slow_ema: usize,
    /// SMA window for the 30-minute regime classification.
    pub regime_sma: usize,
    /// Take-profit distance in reversal regime (fraction of the last close).
    pub reversal_target_pct: f64,
    /// Take-profit distance in continuation regime.
    pub continuation_target_pct: f64,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            fast_ema: 12,
            slow_ema: 21,
            regime_sma: 50,
            reversal_target_pct: 0.02,
            continuation_target_pct: 0.01,
        }
    }
}

/// Evaluates entry conditions across the three timeframes.
#[derive(Debug, Clone)]
pub struct EntryEvaluator {
    config: EntryConfig,
}

impl EntryEvaluator {
    pub fn new(config: EntryConfig) -> Self {
        assert!(config.fast_ema >= 1, "fast_ema must be >= 1");
        assert!(config.slow_ema >= 1, "slow_ema must be >= 1");
        assert!(config.regime_sma >= 1, "regime_sma must be >= 1");
        assert!(
            config.reversal_target_pct > 0.0 && config.continuation_target_pct > 0.0,
            "target percentages must be positive"
        );
        Self { config }
    }

    pub fn config(&self) -> &EntryConfig {
        &self.config
    }

    /// Run the full entry check. Returns a long `SignalParams` when every
    /// condition holds, `None` otherwise — including every insufficient-data
    /// case.
    ///
    /// 1. 10m crossunder on the second-to-last (closed) candle: opened above
    ///    either EMA and closed below either EMA.
    /// 2. 5m deviation line found, and the latest 5m close is strictly above it.
    /// 3. Regime decides the target distance; the target is anchored to the
    ///    latest 10m close.
    ///
    /// Structurally inverted setups (stop at or above entry, target at or
    /// below entry) are discarded as no-signal rather than surfaced as errors.
    pub fn evaluate(
        &self,
        series_10m: &CandleSeries,
        series_5m: &CandleSeries,
        series_30m: Option<&CandleSeries>,
    ) -> Option<SignalParams> {
        let closes_10m = series_10m.closes();
        if closes_10m.len() < 2 {
            return None;
        }
        let ema_fast = ema(&closes_10m, self.config.fast_ema);
        let ema_slow = ema(&closes_10m, self.config.slow_ema);

        // Second-to-last candle: the last fully closed bar when the final
        // candle may still be in progress.
        let prev_index = closes_10m.len() - 2;
        let prev = series_10m.get(prev_index)?;
        let opened_above =
            prev.open > ema_fast[prev_index] || prev.open > ema_slow[prev_index];
        let closed_below =
            prev.close < ema_fast[prev_index] || prev.close < ema_slow[prev_index];
        if !(opened_above && closed_below) {
            return None;
        }

        let levels = find_deviation_line(series_5m, self.config.slow_ema)?;
        let last_5m = series_5m.last()?;
        if last_5m.close <= levels.entry_line {
            return None;
        }
        let entry = last_5m.close;

        let reversal = self.is_reversal(
            series_30m,
            *ema_fast.last()?,
            *ema_slow.last()?,
        );
        let target_pct = if reversal {
            self.config.reversal_target_pct
        } else {
            self.config.continuation_target_pct
        };
        let take_profit = closes_10m.last()? * (1.0 + target_pct);

        if levels.stop_loss >= entry || take_profit <= entry {
            return None;
        }

        Some(SignalParams {
            entry,
            stop_loss: levels.stop_loss,
            take_profit,
            direction: TradeDirection::Long,
            timestamp: last_5m.timestamp,
            dev_line: Some(levels.entry_line),
        })
    }

    /// Reversal regime: the 30-minute SMA sits above both 10-minute EMAs.
    /// Anything short of 50 (well, `regime_sma`) 30-minute candles is
    /// continuation by definition.
    fn is_reversal(
        &self,
        series_30m: Option<&CandleSeries>,
        ema_fast_last: f64,
        ema_slow_last: f64,
    ) -> bool {
        let Some(series) = series_30m else {
            return false;
        };
        if series.len() < self.config.regime_sma {
            return false;
        }
        let sma_line = sma(&series.closes(), self.config.regime_sma);
        match sma_line.last() {
            Some(&sma_last) => sma_last > ema_fast_last && sma_last > ema_slow_last,
            None => false,
        }
    }
}

impl Default for EntryEvaluator {
    fn default() -> Self {
        Self::new(EntryConfig::default())
    }
}
