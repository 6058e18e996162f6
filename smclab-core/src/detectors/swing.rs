//! Swing points — local extrema over a symmetric window.
//!
//! A candle at `i` (with `period <= i < n - period`) is a swing high when its high is
//! `>=` every other high in `[i - period, i + period]`, and a swing low when its low is
//! `<=` every other low in the same window. Ties are inclusive, so a flat top can
//! yield several adjacent swing highs. Candles within `period` of either edge are
//! never evaluated.

use crate::config::SwingConfig;
use crate::detectors::Stage;
use crate::domain::{Candle, SwingKind, SwingPoint};

#[derive(Debug, Clone)]
pub struct SwingDetector {
    period: usize,
}

impl SwingDetector {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "swing period must be >= 1");
        Self { period }
    }

    pub fn from_config(config: &SwingConfig) -> Self {
        Self::new(config.period)
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Swing points in ascending index order; High before Low on the same candle.
    pub fn detect(&self, candles: &[Candle]) -> Vec<SwingPoint> {
        let n = candles.len();
        let mut points = Vec::new();
        if !self.can_run(n) {
            return points;
        }

        for i in self.period..(n - self.period) {
            let window = &candles[i - self.period..=i + self.period];
            let current = &candles[i];

            let is_high = window
                .iter()
                .filter(|c| c.index != current.index)
                .all(|c| current.high >= c.high);
            let is_low = window
                .iter()
                .filter(|c| c.index != current.index)
                .all(|c| current.low <= c.low);

            if is_high {
                points.push(SwingPoint {
                    index: i,
                    price: current.high,
                    kind: SwingKind::High,
                });
            }
            if is_low {
                points.push(SwingPoint {
                    index: i,
                    price: current.low,
                    kind: SwingKind::Low,
                });
            }
        }

        points
    }
}

impl Default for SwingDetector {
    fn default() -> Self {
        Self::from_config(&SwingConfig::default())
    }
}

impl Stage for SwingDetector {
    fn name(&self) -> &str {
        "swing"
    }

    fn min_candles(&self) -> usize {
        2 * self.period + 1
    }
}
