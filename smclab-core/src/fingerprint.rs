//! Content fingerprints for analysis runs.
//!
//! - `ConfigHash`: BLAKE3 of the canonical JSON of a `PipelineConfig`.
//! - `DatasetHash`: BLAKE3 of every candle's timestamp and OHLCV bytes.
//! - `AnalysisFingerprint`: both hashes plus the symbol, with a combined `run_id()`.
//!
//! Two runs with the same fingerprint produce identical `AnalysisResult`s, so callers
//! can cache results by `run_id`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::domain::CandleWindow;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigHash(pub String);

impl ConfigHash {
    /// Struct field order is fixed, so the serialized JSON is canonical.
    pub fn of(config: &PipelineConfig) -> Self {
        let json = serde_json::to_vec(config).expect("PipelineConfig must serialize");
        Self(blake3::hash(&json).to_hex().to_string())
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    pub fn of(window: &CandleWindow) -> Self {
        let mut hasher = blake3::Hasher::new();
        for c in window.candles() {
            hasher.update(&c.timestamp.timestamp_millis().to_le_bytes());
            for v in [c.open, c.high, c.low, c.close, c.volume] {
                hasher.update(&v.to_le_bytes());
            }
        }
        Self(hasher.finalize().to_hex().to_string())
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one analysis: what was analyzed and with which parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFingerprint {
    pub symbol: String,
    pub candle_count: usize,
    pub config_hash: ConfigHash,
    pub dataset_hash: DatasetHash,
}

impl AnalysisFingerprint {
    pub fn new(symbol: impl Into<String>, config: &PipelineConfig, window: &CandleWindow) -> Self {
        Self {
            symbol: symbol.into(),
            candle_count: window.len(),
            config_hash: ConfigHash::of(config),
            dataset_hash: DatasetHash::of(window),
        }
    }

    /// Deterministic run identifier over symbol, config and dataset.
    pub fn run_id(&self) -> String {
        let canonical = serde_json::json!({
            "symbol": &self.symbol,
            "config_hash": &self.config_hash.0,
            "dataset_hash": &self.dataset_hash.0,
        });
        blake3::hash(canonical.to_string().as_bytes())
            .to_hex()
            .to_string()
    }
}
