//! Order blocks — the last opposing candle before a structure break.
//!
//! For a bullish break at `i >= lookback_period`, the origin is the highest-index
//! bearish candle (`close < open`) in `[i - lookback_period, i)`. The block is kept
//! when the move from the origin's low to the break candle's high is at least
//! `min_move_percentage` of that low. Bearish breaks mirror this with the last bullish
//! candle and the drop from the origin's high to the break candle's low.
//!
//! A candle carries at most one block per direction: a later break that resolves to
//! the same origin overwrites the earlier entry.

use std::collections::BTreeMap;

use crate::config::OrderBlockConfig;
use crate::detectors::{percent_move, Stage};
use crate::domain::{Candle, Direction, OrderBlock, StructureBreak};

#[derive(Debug, Clone)]
pub struct OrderBlockDetector {
    lookback_period: usize,
    min_move_percentage: f64,
}

impl OrderBlockDetector {
    pub fn new(lookback_period: usize, min_move_percentage: f64) -> Self {
        assert!(lookback_period >= 1, "lookback_period must be >= 1");
        assert!(
            min_move_percentage.is_finite() && min_move_percentage >= 0.0,
            "min_move_percentage must be finite and >= 0"
        );
        Self {
            lookback_period,
            min_move_percentage,
        }
    }

    pub fn from_config(config: &OrderBlockConfig) -> Self {
        Self::new(config.lookback_period, config.min_move_percentage)
    }

    /// Order blocks in ascending `origin_index` order; bullish before bearish.
    pub fn detect(&self, candles: &[Candle], breaks: &[StructureBreak]) -> Vec<OrderBlock> {
        let mut blocks: BTreeMap<(usize, Direction), OrderBlock> = BTreeMap::new();
        if !self.can_run(candles.len()) {
            return Vec::new();
        }

        for brk in breaks {
            let i = brk.index;
            if i < self.lookback_period || i >= candles.len() {
                continue;
            }
            let trigger = &candles[i];
            let window = &candles[i - self.lookback_period..i];

            let origin = match brk.direction {
                Direction::Bullish => window.iter().rev().find(|c| c.is_bearish()),
                Direction::Bearish => window.iter().rev().find(|c| c.is_bullish()),
            };
            let Some(origin) = origin else {
                continue;
            };

            let moved = match brk.direction {
                Direction::Bullish => percent_move(origin.low, trigger.high, origin.low),
                Direction::Bearish => percent_move(trigger.low, origin.high, origin.high),
            };
            if !moved.is_some_and(|pct| pct >= self.min_move_percentage) {
                continue;
            }

            blocks.insert(
                (origin.index, brk.direction),
                OrderBlock {
                    origin_index: origin.index,
                    high: origin.high,
                    low: origin.low,
                    direction: brk.direction,
                    trigger_index: i,
                },
            );
        }

        blocks.into_values().collect()
    }
}

impl Default for OrderBlockDetector {
    fn default() -> Self {
        Self::from_config(&OrderBlockConfig::default())
    }
}

impl Stage for OrderBlockDetector {
    fn name(&self) -> &str {
        "order_block"
    }

    fn min_candles(&self) -> usize {
        self.lookback_period + 1
    }
}
