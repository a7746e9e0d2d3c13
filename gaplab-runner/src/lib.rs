//! GapLab Runner — drives the core pipeline over historical data.
//!
//! The runner owns everything the core deliberately does not: configuration
//! files, CSV data loading, timeframe resampling, the bar-by-bar replay loop,
//! and performance metrics. The core is called once per closed base candle
//! with rolling multi-timeframe windows, exactly like a live polling loop
//! would call it.

pub mod config;
pub mod data;
pub mod metrics;
pub mod replay;
pub mod resample;
pub mod result;
pub mod sample_data;

pub use config::{BacktestConfig, ConfigError, RunId, StrategyParams};
pub use data::{load_csv, DataError};
pub use metrics::PerformanceMetrics;
pub use replay::{run_backtest, ReplayError};
pub use resample::{resample, TimeframeAggregator};
pub use result::{BacktestResult, EquityPoint, TradeRecord};
pub use sample_data::synthetic_series;
