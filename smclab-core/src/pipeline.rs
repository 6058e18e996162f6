//! The five-stage analysis pipeline.
//!
//! `Pipeline::run` executes swing -> structure -> order_block, swing -> trend_line,
//! and order_block -> signals over one immutable candle window. Every stage gets
//! the typed output it depends on as an explicit argument.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ConfigError, PipelineConfig};
use crate::detectors::{
    OrderBlockDetector, Stage, StructureBreakDetector, SwingDetector, TrendLineDetector,
};
use crate::domain::{
    CandleWindow, Direction, OrderBlock, StructureBreak, SwingKind, SwingPoint, TradingSignal,
    TrendLine, TrendLineKind,
};
use crate::signals::SignalSynthesizer;

/// Everything the pipeline derives from one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub candle_count: usize,
    /// Close of the last candle, `None` for an empty window.
    pub current_price: Option<f64>,
    pub swing_points: Vec<SwingPoint>,
    pub structure_breaks: Vec<StructureBreak>,
    pub order_blocks: Vec<OrderBlock>,
    pub trend_lines: Vec<TrendLine>,
    pub signals: Vec<TradingSignal>,
}

/// Headline counts for reports and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub candle_count: usize,
    pub swing_highs: usize,
    pub swing_lows: usize,
    pub bullish_breaks: usize,
    pub bearish_breaks: usize,
    pub bullish_order_blocks: usize,
    pub bearish_order_blocks: usize,
    pub support_lines: usize,
    pub resistance_lines: usize,
    pub signals: usize,
    pub active_signals: usize,
}

impl AnalysisResult {
    pub fn summary(&self) -> AnalysisSummary {
        let breaks =
            |d: Direction| self.structure_breaks.iter().filter(|b| b.direction == d).count();
        let blocks = |d: Direction| self.order_blocks.iter().filter(|b| b.direction == d).count();
        let swings = |k: SwingKind| self.swing_points.iter().filter(|s| s.kind == k).count();
        let lines = |k: TrendLineKind| self.trend_lines.iter().filter(|l| l.kind == k).count();

        AnalysisSummary {
            candle_count: self.candle_count,
            swing_highs: swings(SwingKind::High),
            swing_lows: swings(SwingKind::Low),
            bullish_breaks: breaks(Direction::Bullish),
            bearish_breaks: breaks(Direction::Bearish),
            bullish_order_blocks: blocks(Direction::Bullish),
            bearish_order_blocks: blocks(Direction::Bearish),
            support_lines: lines(TrendLineKind::Support),
            resistance_lines: lines(TrendLineKind::Resistance),
            signals: self.signals.len(),
            active_signals: self.signals.iter().filter(|s| s.is_active()).count(),
        }
    }

    pub fn active_signals(&self) -> impl Iterator<Item = &TradingSignal> {
        self.signals.iter().filter(|s| s.is_active())
    }
}

/// A validated, reusable set of stages.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    swing: SwingDetector,
    structure: StructureBreakDetector,
    order_block: OrderBlockDetector,
    trend_line: TrendLineDetector,
    signals: SignalSynthesizer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            swing: SwingDetector::from_config(&config.swing),
            structure: StructureBreakDetector::from_config(&config.structure),
            order_block: OrderBlockDetector::from_config(&config.order_block),
            trend_line: TrendLineDetector::new(config.trend_lines.clone()),
            signals: SignalSynthesizer::new(config.signals.clone()),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage over `window`. Short windows yield empty annotation lists.
    pub fn run(&self, window: &CandleWindow) -> AnalysisResult {
        let candles = window.candles();
        let n = candles.len();

        let swing_points = self.swing.detect(candles);
        log_stage(&self.swing, n, swing_points.len());

        let structure_breaks = self.structure.detect(candles, &swing_points);
        log_stage(&self.structure, n, structure_breaks.len());

        let order_blocks = self.order_block.detect(candles, &structure_breaks);
        log_stage(&self.order_block, n, order_blocks.len());

        let trend_lines = self.trend_line.detect(candles, &swing_points);
        log_stage(&self.trend_line, n, trend_lines.len());

        let signals = self.signals.synthesize(candles, &order_blocks);
        debug!(stage = "signals", produced = signals.len(), "stage complete");

        AnalysisResult {
            candle_count: n,
            current_price: window.current_price(),
            swing_points,
            structure_breaks,
            order_blocks,
            trend_lines,
            signals,
        }
    }
}

fn log_stage(stage: &dyn Stage, candles: usize, produced: usize) {
    if stage.can_run(candles) {
        debug!(stage = stage.name(), produced, "stage complete");
    } else {
        debug!(
            stage = stage.name(),
            candles,
            required = stage.min_candles(),
            "window too short, stage skipped"
        );
    }
}
