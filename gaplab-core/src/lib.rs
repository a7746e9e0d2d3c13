//! GapLab Core — the FVG signal-generation pipeline.
//!
//! This crate contains the heart of the trading system:
//! - Domain types (candles, series, trade signals)
//! - Trend indicators (EMA, SMA)
//! - Fair Value Gap detection and fill/invalidation lifecycle tracking
//! - Deviation-line / stop-loss structural search
//! - Entry evaluation combining crossunder filter, deviation line, and regime
//! - Single-slot trade signal lifecycle (create, SL/TP exit)
//!
//! The core is single-threaded and synchronous: one logical driver (a backtest
//! replay or a live polling loop) feeds candle series in and receives at most
//! one trade signal per tick. "Nothing found" outcomes are `None`, never errors.

pub mod deviation;
pub mod domain;
pub mod entry;
pub mod fvg;
pub mod indicators;
pub mod lifecycle;
pub mod strategy;
