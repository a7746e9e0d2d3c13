//! Trade signals — the pipeline's sole output type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Directional intent of a trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    Long,
    Short,
}

/// Signal lifecycle status.
///
/// Signals are created Pending and move to Closed via the lifecycle exit
/// check. `Active` exists for exchange-confirmed fills but no core code path
/// sets it — the field is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Pending,
    Active,
    Closed,
}

/// Why a closed signal exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "SL"),
            ExitReason::TakeProfit => write!(f, "TP"),
        }
    }
}

/// Errors from signal construction.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("non-finite signal level: entry={entry}, stop_loss={stop_loss}, take_profit={take_profit}")]
    NonFiniteLevel {
        entry: f64,
        stop_loss: f64,
        take_profit: f64,
    },

    #[error(
        "invalid {direction:?} levels: require stop < entry < target for long, \
         target < entry < stop for short (entry={entry}, stop_loss={stop_loss}, \
         take_profit={take_profit})"
    )]
    InvalidLevels {
        direction: TradeDirection,
        entry: f64,
        stop_loss: f64,
        take_profit: f64,
    },
}

/// Fully specified constructor input for a trade signal.
///
/// Every field is explicit — there is no partial or keyword-style
/// construction path. `TradeSignal::new` validates level ordering for the
/// given direction and rejects incoherent setups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalParams {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub direction: TradeDirection,
    pub timestamp: DateTime<Utc>,
    /// The deviation line the entry reclaimed, when the setup has one.
    pub dev_line: Option<f64>,
}

/// Complete trade specification emitted by the entry evaluator.
///
/// Owned exclusively by the signal lifecycle while live; once closed it is
/// historical and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub direction: TradeDirection,
    pub timestamp: DateTime<Utc>,
    pub status: TradeStatus,
    pub exit_price: Option<f64>,
    pub exit_reason: Option<ExitReason>,
    pub dev_line: Option<f64>,
}

impl TradeSignal {
    /// Validate params and build a Pending signal.
    ///
    /// Long setups require `stop_loss < entry < take_profit`; short setups
    /// the mirror ordering. Non-finite levels are always rejected.
    pub fn new(params: SignalParams) -> Result<Self, SignalError> {
        let SignalParams {
            entry,
            stop_loss,
            take_profit,
            direction,
            timestamp,
            dev_line,
        } = params;

        if !entry.is_finite() || !stop_loss.is_finite() || !take_profit.is_finite() {
            return Err(SignalError::NonFiniteLevel {
                entry,
                stop_loss,
                take_profit,
            });
        }

        let ordered = match direction {
            TradeDirection::Long => stop_loss < entry && entry < take_profit,
            TradeDirection::Short => take_profit < entry && entry < stop_loss,
        };
        if !ordered {
            return Err(SignalError::InvalidLevels {
                direction,
                entry,
                stop_loss,
                take_profit,
            });
        }

        Ok(Self {
            entry,
            stop_loss,
            take_profit,
            direction,
            timestamp,
            status: TradeStatus::Pending,
            exit_price: None,
            exit_reason: None,
            dev_line,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }
}
