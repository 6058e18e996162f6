//! Trend lines fitted through pairs of swing points.

use serde::{Deserialize, Serialize};

/// Support lines connect swing lows, resistance lines connect swing highs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrendLineKind {
    Support,
    Resistance,
}

/// `price = slope * index + intercept`, scored by how many candles it passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub kind: TrendLineKind,
    pub slope: f64,
    pub intercept: f64,
    /// Index of the earlier anchoring swing point.
    pub start_index: usize,
    /// Last candle of the evaluated window.
    pub end_index: usize,
    pub touches: usize,
    pub strength: f64,
    /// Ascending indices whose high (resistance) or low (support) lies within tolerance.
    pub touch_points: Vec<usize>,
}

impl TrendLine {
    /// Line price at a candle index.
    pub fn price_at(&self, index: usize) -> f64 {
        self.slope * index as f64 + self.intercept
    }

    /// Slope angle in degrees, treating one index step as one price unit.
    pub fn angle_degrees(&self) -> f64 {
        self.slope.atan().to_degrees()
    }
}
