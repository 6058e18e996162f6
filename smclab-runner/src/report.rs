//! Analysis report — one symbol's result plus everything needed to identify it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smclab_core::fingerprint::AnalysisFingerprint;
use smclab_core::{AnalysisResult, AnalysisSummary, CandleWindow, Pipeline};
use tracing::info;

/// Bumped whenever the report layout changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub schema_version: u32,
    pub symbol: String,
    pub run_id: String,
    pub fingerprint: AnalysisFingerprint,
    /// Timestamp of the first analyzed candle.
    pub window_start: Option<DateTime<Utc>>,
    /// Timestamp of the last analyzed candle.
    pub window_end: Option<DateTime<Utc>>,
    pub summary: AnalysisSummary,
    pub result: AnalysisResult,
}

/// Run `pipeline` over `window` and wrap the result for export.
pub fn analyze_window(symbol: &str, window: &CandleWindow, pipeline: &Pipeline) -> AnalysisReport {
    let fingerprint = AnalysisFingerprint::new(symbol, pipeline.config(), window);
    let result = pipeline.run(window);
    let summary = result.summary();

    info!(
        symbol,
        candles = summary.candle_count,
        breaks = summary.bullish_breaks + summary.bearish_breaks,
        order_blocks = summary.bullish_order_blocks + summary.bearish_order_blocks,
        trend_lines = summary.support_lines + summary.resistance_lines,
        active_signals = summary.active_signals,
        "analysis complete"
    );

    AnalysisReport {
        schema_version: SCHEMA_VERSION,
        symbol: symbol.to_string(),
        run_id: fingerprint.run_id(),
        fingerprint,
        window_start: window.first().map(|c| c.timestamp),
        window_end: window.last().map(|c| c.timestamp),
        summary,
        result,
    }
}
