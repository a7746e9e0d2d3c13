//! Backtest result types and JSON export.

use chrono::{DateTime, Utc};
use gaplab_core::domain::{ExitReason, TradeDirection, TradeSignal};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::RunId;
use crate::metrics::PerformanceMetrics;

/// Single point in the equity curve — one per base candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
}

/// One completed round trip produced by the replay loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    pub direction: TradeDirection,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub pnl: f64,
    pub return_pct: f64,
    pub exit_reason: ExitReason,
    /// Deviation line of the setup, when recorded on the signal.
    pub dev_line: Option<f64>,
}

/// Complete result of a backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Content hash of the configuration that produced this run.
    pub run_id: RunId,
    pub symbol: String,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<TradeRecord>,
    pub metrics: PerformanceMetrics,
    /// Signal still open when the data ran out, if any.
    pub open_signal: Option<TradeSignal>,
}

impl BacktestResult {
    /// Write the result as `<run_id>.json` under `dir` and return the path.
    pub fn save_json(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", self.run_id));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}
