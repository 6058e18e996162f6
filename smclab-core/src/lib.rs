//! SMC Lab Core — domain types and the market-structure detection pipeline.
//!
//! This crate turns an immutable candle window into:
//! - Swing highs and lows
//! - Breaks of structure
//! - Order blocks
//! - Support and resistance trend lines
//! - Fixed-ratio trading signals anchored at order blocks
//!
//! Everything here is pure and synchronous. Loading data and writing reports live in
//! `smclab-runner`.

pub mod config;
pub mod detectors;
pub mod domain;
pub mod fingerprint;
pub mod pipeline;
pub mod signals;

pub use config::{ConfigError, PipelineConfig, TrendLineProfile};
pub use domain::{Candle, CandleError, CandleWindow, RawCandle};
pub use pipeline::{AnalysisResult, AnalysisSummary, Pipeline};
