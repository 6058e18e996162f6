//! SMC Lab Runner — file-driven analysis on top of `smclab-core`.
//!
//! This crate provides:
//! - TOML run configuration with trend-line profiles and batch options
//! - CSV candle loading (epoch-millisecond or RFC 3339 timestamps)
//! - Single-symbol reports with content fingerprints
//! - Parallel batch analysis across symbols
//! - JSON and CSV export

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod report;

pub use batch::{analyze_file, run_batch, BatchFailure, BatchResult, RunError, SymbolInput};
pub use config::{BatchConfig, RunnerConfig, RunnerConfigError};
pub use data_loader::{load_candles, read_candles, LoadError, LoadOptions};
pub use export::{export_json, import_json, save_artifacts};
pub use report::{analyze_window, AnalysisReport, SCHEMA_VERSION};
