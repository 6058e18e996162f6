//! Signal synthesis — turns recent order blocks into entry/stop/target proposals.
//!
//! Signals read order blocks and the current price only. Trend lines are an overlay
//! for presentation and never feed signal synthesis.

pub mod synthesizer;

pub use synthesizer::SignalSynthesizer;

/// Round to two decimal places, the precision reported for risk/reward percentages.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
