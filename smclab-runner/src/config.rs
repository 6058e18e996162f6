//! TOML run configuration.
//!
//! The file mirrors `PipelineConfig` table-for-table, with two top-level keys and a
//! `[batch]` table on top:
//!
//! ```toml
//! profile = "advanced"   # optional trend-line profile
//! limit = 500            # optional: analyze only the last N candles
//!
//! [swing]
//! period = 5
//!
//! [trend_lines]
//! tolerance_percentage = 0.5
//!
//! [batch]
//! parallel = true
//! threads = 4
//! ```
//!
//! Every key is optional; missing keys take the pipeline defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use smclab_core::config::{
    OrderBlockConfig, SignalConfig, StructureConfig, SwingConfig, TrendLineConfig,
};
use smclab_core::{ConfigError, PipelineConfig, TrendLineProfile};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid pipeline parameters: {0}")]
    Invalid(#[from] ConfigError),

    #[error("batch.threads must be >= 1")]
    ZeroThreads,
}

/// How `run_batch` schedules independent symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub parallel: bool,
    /// Worker threads for parallel batches. `None` uses the global rayon pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Trend-line profile; overrides `min_touches`, `max_lines` and `strength`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<TrendLineProfile>,
    /// Keep only the last N loaded candles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    pub swing: SwingConfig,
    pub structure: StructureConfig,
    pub order_block: OrderBlockConfig,
    pub trend_lines: TrendLineConfig,
    pub signals: SignalConfig,
    pub batch: BatchConfig,
}

impl RunnerConfig {
    pub fn from_toml(content: &str) -> Result<Self, RunnerConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, RunnerConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| RunnerConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, RunnerConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The effective pipeline parameters, with the profile applied and validated.
    pub fn pipeline_config(&self) -> Result<PipelineConfig, RunnerConfigError> {
        let mut trend_lines = self.trend_lines.clone();
        if let Some(profile) = self.profile {
            trend_lines.apply_profile(profile);
        }
        let config = PipelineConfig {
            swing: self.swing.clone(),
            structure: self.structure.clone(),
            order_block: self.order_block.clone(),
            trend_lines,
            signals: self.signals.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RunnerConfigError> {
        if self.batch.threads == Some(0) {
            return Err(RunnerConfigError::ZeroThreads);
        }
        self.pipeline_config().map(|_| ())
    }
}
