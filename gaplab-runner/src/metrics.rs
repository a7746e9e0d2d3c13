//! Performance metrics — pure functions over the equity curve and trade list.
//!
//! Every metric is a pure function: curve and/or trades in, scalar out. No
//! dependencies on the replay loop or data layer.

use serde::{Deserialize, Serialize};

use crate::result::TradeRecord;

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub trade_count: usize,
    pub avg_return_pct: f64,
}

impl PerformanceMetrics {
    /// Compute all metrics from an equity curve and trade list.
    pub fn compute(equity: &[f64], trades: &[TradeRecord], initial_capital: f64) -> Self {
        Self {
            total_return: total_return(equity, initial_capital),
            max_drawdown: max_drawdown(equity),
            win_rate: win_rate(trades),
            profit_factor: profit_factor(trades),
            trade_count: trades.len(),
            avg_return_pct: avg_return_pct(trades),
        }
    }
}

/// Total return as a fraction of initial capital.
pub fn total_return(equity: &[f64], initial_capital: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    match equity.last() {
        Some(&last) => (last - initial_capital) / initial_capital,
        None => 0.0,
    }
}

/// Largest peak-to-trough decline as a positive fraction.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst: f64 = 0.0;
    for &value in equity {
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst
}

/// Fraction of trades with positive pnl. Zero trades → 0.
pub fn win_rate(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let wins = trades.iter().filter(|t| t.pnl > 0.0).count();
    wins as f64 / trades.len() as f64
}

/// Gross profits over gross losses.
///
/// Capped at 100.0 so the edge cases (all winners, zero losses) stay finite
/// and survive the JSON export — serde_json writes non-finite floats as null.
pub fn profit_factor(trades: &[TradeRecord]) -> f64 {
    let gross_profit: f64 = trades.iter().map(|t| t.pnl.max(0.0)).sum();
    let gross_loss: f64 = trades.iter().map(|t| (-t.pnl).max(0.0)).sum();
    if gross_loss < 1e-10 {
        return if gross_profit > 0.0 { 100.0 } else { 0.0 };
    }
    (gross_profit / gross_loss).min(100.0)
}

/// Mean per-trade return. Zero trades → 0.
pub fn avg_return_pct(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().map(|t| t.return_pct).sum::<f64>() / trades.len() as f64
}
