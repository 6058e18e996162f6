//! Break of structure (BOS).
//!
//! For each candle `i >= STRUCTURE_WARMUP`:
//! - bullish: `H = max` price of the last `RECENT_SWINGS` swing highs with index `< i`;
//!   break when `close[i] > H` and `(close[i] - H) / H * 100 >= min_move_percentage`.
//! - bearish: `L = min` price of the last `RECENT_SWINGS` swing lows with index `< i`;
//!   break when `close[i] < L` and `(L - close[i]) / L * 100 >= min_move_percentage`.
//!
//! "Last" means most recent by index, not extreme by price.

use crate::config::StructureConfig;
use crate::detectors::{percent_move, Stage};
use crate::domain::{Candle, Direction, StructureBreak, SwingKind, SwingPoint};

/// Candles before this index are never checked for a break.
pub const STRUCTURE_WARMUP: usize = 10;

/// How many of the most recent swing points form the reference extreme.
pub const RECENT_SWINGS: usize = 3;

#[derive(Debug, Clone)]
pub struct StructureBreakDetector {
    min_move_percentage: f64,
}

impl StructureBreakDetector {
    pub fn new(min_move_percentage: f64) -> Self {
        assert!(
            min_move_percentage.is_finite() && min_move_percentage >= 0.0,
            "min_move_percentage must be finite and >= 0"
        );
        Self {
            min_move_percentage,
        }
    }

    pub fn from_config(config: &StructureConfig) -> Self {
        Self::new(config.min_move_percentage)
    }

    /// Breaks in ascending index order; bullish before bearish on the same candle.
    ///
    /// `swings` must be the swing points for the same window, in ascending index order
    /// as produced by [`crate::detectors::SwingDetector::detect`].
    pub fn detect(&self, candles: &[Candle], swings: &[SwingPoint]) -> Vec<StructureBreak> {
        let mut breaks = Vec::new();
        if !self.can_run(candles.len()) {
            return breaks;
        }

        let highs: Vec<&SwingPoint> = swings.iter().filter(|s| s.kind == SwingKind::High).collect();
        let lows: Vec<&SwingPoint> = swings.iter().filter(|s| s.kind == SwingKind::Low).collect();

        for candle in &candles[STRUCTURE_WARMUP..] {
            let i = candle.index;

            if let Some(reference) = recent_extreme(&highs, i, f64::max) {
                if candle.close > reference {
                    if let Some(pct) = percent_move(reference, candle.close, reference) {
                        if pct >= self.min_move_percentage {
                            breaks.push(StructureBreak {
                                index: i,
                                direction: Direction::Bullish,
                                move_percentage: pct,
                            });
                        }
                    }
                }
            }

            if let Some(reference) = recent_extreme(&lows, i, f64::min) {
                if candle.close < reference {
                    if let Some(pct) = percent_move(candle.close, reference, reference) {
                        if pct >= self.min_move_percentage {
                            breaks.push(StructureBreak {
                                index: i,
                                direction: Direction::Bearish,
                                move_percentage: pct,
                            });
                        }
                    }
                }
            }
        }

        breaks
    }
}

/// Fold the prices of the last `RECENT_SWINGS` points strictly before `index`.
fn recent_extreme(
    points: &[&SwingPoint],
    index: usize,
    fold: fn(f64, f64) -> f64,
) -> Option<f64> {
    let end = points.partition_point(|p| p.index < index);
    let start = end.saturating_sub(RECENT_SWINGS);
    points[start..end].iter().map(|p| p.price).reduce(fold)
}

impl Default for StructureBreakDetector {
    fn default() -> Self {
        Self::from_config(&StructureConfig::default())
    }
}

impl Stage for StructureBreakDetector {
    fn name(&self) -> &str {
        "structure"
    }

    fn min_candles(&self) -> usize {
        STRUCTURE_WARMUP + 1
    }
}
