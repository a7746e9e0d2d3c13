//! Signal lifecycle — owns the single active trade slot and closes it on
//! stop-loss or take-profit.
//!
//! At most one signal is live at any time. `create` silently rejects while a
//! signal is open; `check_exit` arbitrates SL/TP against each incoming candle
//! with stop-loss priority on same-candle ties (intra-candle ordering is
//! unknown, so the conservative outcome wins).

use serde::{Deserialize, Serialize};

use crate::domain::{
    Candle, ExitReason, SignalError, SignalParams, TradeDirection, TradeSignal, TradeStatus,
};

/// A closed-trade notification returned by `check_exit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitEvent {
    pub exit_price: f64,
    pub reason: ExitReason,
    /// The closed signal, exit fields populated.
    pub signal: TradeSignal,
}

/// Holds at most one open trade signal and its closed history.
#[derive(Debug, Clone, Default)]
pub struct SignalLifecycle {
    active: Option<TradeSignal>,
    closed: Vec<TradeSignal>,
}

impl SignalLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&TradeSignal> {
        self.active.as_ref()
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    /// Closed signals in exit order.
    pub fn closed(&self) -> &[TradeSignal] {
        &self.closed
    }

    /// Validate params and store a new signal, unless one is already open.
    ///
    /// `Ok(None)` means the slot was occupied — existing state is unchanged
    /// and the caller should simply try again after the next exit. `Err` only
    /// fires for structurally invalid params.
    pub fn create(&mut self, params: SignalParams) -> Result<Option<TradeSignal>, SignalError> {
        if self.active.is_some() {
            return Ok(None);
        }
        let signal = TradeSignal::new(params)?;
        self.active = Some(signal.clone());
        Ok(Some(signal))
    }

    /// Check the open signal against a candle; close it if SL or TP was hit.
    ///
    /// Long: SL triggers at `low <= stop_loss` (checked first), else TP at
    /// `high >= take_profit`. Short is the mirror. Exits fill at the level.
    /// No-op when no signal is open.
    pub fn check_exit(&mut self, candle: &Candle) -> Option<ExitEvent> {
        let open = self.active.as_ref()?;
        let (exit_price, reason) = match open.direction {
            TradeDirection::Long => {
                if candle.low <= open.stop_loss {
                    (open.stop_loss, ExitReason::StopLoss)
                } else if candle.high >= open.take_profit {
                    (open.take_profit, ExitReason::TakeProfit)
                } else {
                    return None;
                }
            }
            TradeDirection::Short => {
                if candle.high >= open.stop_loss {
                    (open.stop_loss, ExitReason::StopLoss)
                } else if candle.low <= open.take_profit {
                    (open.take_profit, ExitReason::TakeProfit)
                } else {
                    return None;
                }
            }
        };

        let mut signal = self.active.take()?;
        signal.exit_price = Some(exit_price);
        signal.exit_reason = Some(reason);
        signal.status = TradeStatus::Closed;
        self.closed.push(signal.clone());
        Some(ExitEvent {
            exit_price,
            reason,
            signal,
        })
    }
}
