//! Market-structure annotations: swing points, structure breaks, order blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which extreme a swing point marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SwingKind {
    High,
    Low,
}

/// A local price extremum relative to a symmetric neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub index: usize,
    /// The candle's high for [`SwingKind::High`], its low for [`SwingKind::Low`].
    pub price: f64,
    pub kind: SwingKind,
}

/// Directional bias shared by structure breaks and order blocks.
///
/// Ordered `Bullish < Bearish` so collections keyed by `(index, Direction)` list the
/// bullish annotation first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Bullish => "bullish",
            Direction::Bearish => "bearish",
        })
    }
}

/// A close that broke a recent swing extreme by at least the configured percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureBreak {
    /// The candle whose close caused the break.
    pub index: usize,
    pub direction: Direction,
    pub move_percentage: f64,
}

/// A reusable price zone anchored at the last opposite-coloured candle before a break.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBlock {
    /// The causal candle, strictly before `trigger_index`.
    pub origin_index: usize,
    pub high: f64,
    pub low: f64,
    pub direction: Direction,
    /// The break candle that (last) validated this block.
    pub trigger_index: usize,
}

impl OrderBlock {
    /// Midpoint of the zone.
    pub fn mid(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// True when both bounds are finite numbers.
    pub fn is_defined(&self) -> bool {
        self.high.is_finite() && self.low.is_finite()
    }
}
