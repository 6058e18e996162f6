//! Batch analysis over independent symbols.
//!
//! Each input file is loaded and analyzed on its own; one symbol failing to load
//! never aborts the others. Parallel batches run on rayon, either on the global pool
//! or on a dedicated pool sized by `batch.threads`.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smclab_core::Pipeline;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{RunnerConfig, RunnerConfigError};
use crate::data_loader::{load_candles, symbol_from_path, LoadError, LoadOptions};
use crate::report::{analyze_window, AnalysisReport};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] RunnerConfigError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// One CSV file to analyze under a symbol name.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInput {
    pub symbol: String,
    pub path: PathBuf,
}

impl SymbolInput {
    pub fn new(symbol: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            symbol: symbol.into(),
            path: path.into(),
        }
    }

    /// Symbol named after the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            symbol: symbol_from_path(&path),
            path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub symbol: String,
    pub error: String,
}

/// Reports and failures, both in input order.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub reports: Vec<AnalysisReport>,
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Load one CSV and analyze it with an already-built pipeline.
pub fn analyze_file(
    symbol: &str,
    path: &Path,
    pipeline: &Pipeline,
    opts: &LoadOptions,
) -> Result<AnalysisReport, LoadError> {
    let window = load_candles(path, opts)?;
    if window.is_empty() {
        warn!(symbol, path = %path.display(), "no candles loaded");
    }
    Ok(analyze_window(symbol, &window, pipeline))
}

/// Analyze every input. Configuration errors abort; per-symbol load errors are collected.
pub fn run_batch(inputs: &[SymbolInput], config: &RunnerConfig) -> Result<BatchResult, RunError> {
    config.validate()?;
    let pipeline = Pipeline::new(config.pipeline_config()?).map_err(RunnerConfigError::from)?;
    let opts = LoadOptions {
        limit: config.limit,
    };

    let analyze = |input: &SymbolInput| {
        let outcome = analyze_file(&input.symbol, &input.path, &pipeline, &opts);
        (input.symbol.clone(), outcome)
    };

    let outcomes: Vec<(String, Result<AnalysisReport, LoadError>)> = if config.batch.parallel {
        match config.batch.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| inputs.par_iter().map(analyze).collect())
            }
            None => inputs.par_iter().map(analyze).collect(),
        }
    } else {
        inputs.iter().map(analyze).collect()
    };

    let mut batch = BatchResult::default();
    for (symbol, outcome) in outcomes {
        match outcome {
            Ok(report) => batch.reports.push(report),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "symbol failed");
                batch.failures.push(BatchFailure {
                    symbol,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        analyzed = batch.reports.len(),
        failed = batch.failures.len(),
        "batch complete"
    );
    Ok(batch)
}
