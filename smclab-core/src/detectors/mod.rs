//! Detection stages.
//!
//! Each detector is a pure function of the candle window plus the typed output of
//! the stage it depends on:
//!
//! ```text
//! swing ──► structure ──► order_block ──► (signals)
//!   └─────► trend_line
//! ```
//!
//! No detector mutates candles or reads another stage's output implicitly.

pub mod order_block;
pub mod structure;
pub mod swing;
pub mod trend_line;

pub use order_block::OrderBlockDetector;
pub use structure::{StructureBreakDetector, RECENT_SWINGS, STRUCTURE_WARMUP};
pub use swing::SwingDetector;
pub use trend_line::TrendLineDetector;

/// Common metadata every stage exposes to the pipeline.
pub trait Stage: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Window length below which the stage cannot produce any output.
    fn min_candles(&self) -> usize;

    /// Whether a window of `n` candles is long enough to run this stage.
    fn can_run(&self, n: usize) -> bool {
        n >= self.min_candles()
    }
}

/// Percentage distance of `value` past `reference`, or `None` for a non-positive reference.
pub(crate) fn percent_move(from: f64, to: f64, reference: f64) -> Option<f64> {
    if reference <= 0.0 || !reference.is_finite() {
        return None;
    }
    let pct = (to - from) / reference * 100.0;
    pct.is_finite().then_some(pct)
}

/// Build a candle window from `(open, high, low, close)` tuples, one minute apart.
#[cfg(test)]
pub fn make_candles(data: &[(f64, f64, f64, f64)]) -> crate::domain::CandleWindow {
    use crate::domain::{CandleWindow, RawCandle};
    use chrono::TimeZone;
    let base = chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    CandleWindow::new(data.iter().enumerate().map(|(i, &(open, high, low, close))| RawCandle {
        timestamp: base + chrono::Duration::minutes(i as i64),
        open,
        high,
        low,
        close,
        volume: 1_000.0,
    }))
    .unwrap()
}

/// Candles with the given highs and lows; open/close sit at the midpoint.
#[cfg(test)]
pub fn make_hl_candles(highs: &[f64], lows: &[f64]) -> crate::domain::CandleWindow {
    let data: Vec<_> = highs
        .iter()
        .zip(lows)
        .map(|(&h, &l)| {
            let mid = (h + l) / 2.0;
            (mid, h, l, mid)
        })
        .collect();
    make_candles(&data)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_move_guards_reference() {
        assert_eq!(percent_move(100.0, 103.0, 100.0), Some(3.0));
        assert_eq!(percent_move(100.0, 103.0, 0.0), None);
        assert_eq!(percent_move(100.0, 103.0, -1.0), None);
    }
}
