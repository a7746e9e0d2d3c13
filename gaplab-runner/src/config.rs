//! Serializable backtest configuration.

use gaplab_core::entry::EntryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Errors from config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Strategy parameters as they appear in config files.
///
/// Mirrors `EntryConfig` field for field; kept separate so the core stays
/// free of file-format concerns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategyParams {
    pub fast_ema: usize,
    pub slow_ema: usize,
    pub regime_sma: usize,
    pub reversal_target_pct: f64,
    pub continuation_target_pct: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        let core = EntryConfig::default();
        Self {
            fast_ema: core.fast_ema,
            slow_ema: core.slow_ema,
            regime_sma: core.regime_sma,
            reversal_target_pct: core.reversal_target_pct,
            continuation_target_pct: core.continuation_target_pct,
        }
    }
}

impl StrategyParams {
    pub fn entry_config(&self) -> EntryConfig {
        EntryConfig {
            fast_ema: self.fast_ema,
            slow_ema: self.slow_ema,
            regime_sma: self.regime_sma,
            reversal_target_pct: self.reversal_target_pct,
            continuation_target_pct: self.continuation_target_pct,
        }
    }
}

/// Serializable configuration for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestConfig {
    /// Instrument label carried into trade records.
    pub symbol: String,

    /// Starting capital.
    pub initial_capital: f64,

    /// Fraction of current equity committed per trade.
    pub stake_fraction: f64,

    /// Strategy parameters.
    pub strategy: StrategyParams,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            initial_capital: 1_000_000.0,
            stake_fraction: 1.0,
            strategy: StrategyParams::default(),
        }
    }
}

impl BacktestConfig {
    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share the same RunId, which makes
    /// result files content-addressable.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("BacktestConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        hash.to_hex().to_string()
    }

    /// Load a config from a TOML file. Missing fields take defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
