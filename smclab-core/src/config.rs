//! Pipeline configuration.
//!
//! Every tunable is an explicit field with the documented default; there is no
//! hidden global state. All structs deserialize with `#[serde(default)]`, so a
//! partial TOML/JSON document overrides only what it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Out-of-range configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        value: usize,
        min: usize,
    },

    #[error("{field} must be a finite number in ({min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

fn check_count(field: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::TooSmall { field, value, min });
    }
    Ok(())
}

/// Accepts `min < value <= max` (or `min <= value` when `inclusive_min`).
fn check_float(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    inclusive_min: bool,
) -> Result<(), ConfigError> {
    let above_min = if inclusive_min { value >= min } else { value > min };
    if !value.is_finite() || !above_min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingConfig {
    /// Half-width of the comparison window.
    pub period: usize,
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self { period: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Minimum close-beyond-swing move, in percent.
    pub min_move_percentage: f64,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            min_move_percentage: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBlockConfig {
    /// How many candles before the break to search for the origin candle.
    pub lookback_period: usize,
    /// Minimum origin-to-break move, in percent, for the block to be kept.
    pub min_move_percentage: f64,
}

impl Default for OrderBlockConfig {
    fn default() -> Self {
        Self {
            lookback_period: 20,
            min_move_percentage: 1.5,
        }
    }
}

/// Candles the `Advanced` profile evaluates trend lines over.
pub const ADVANCED_RECENT_WINDOW: usize = 100;

/// Named trend-line parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLineProfile {
    /// 3 touches minimum, 5 lines, span-weighted strength.
    Standard,
    /// 2 touches minimum, 8 lines, touch-weighted strength with an unbroken bonus,
    /// evaluated over the last [`ADVANCED_RECENT_WINDOW`] candles.
    Advanced,
}

impl std::str::FromStr for TrendLineProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!(
                "unknown trend-line profile '{other}' (expected 'standard' or 'advanced')"
            )),
        }
    }
}

/// How a trend line's strength score is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthModel {
    /// `touches * span / n`.
    SpanWeighted,
    /// `0.4 * touches + 0.3 * n / 100`, plus 0.5 when the last 20 candles respect the line.
    TouchWeighted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendLineConfig {
    pub min_touches: usize,
    /// Maximum relative distance, in percent, for a candle to count as a touch.
    pub tolerance_percentage: f64,
    /// Lines steeper than this (in degrees, one index step = one price unit) are rejected.
    pub max_slope_angle: f64,
    pub max_lines: usize,
    pub strength: StrengthModel,
    /// Per-kind swing-point cap; a kind with more points is skipped entirely.
    pub max_swing_points: usize,
    /// Evaluate only the last N candles. `None` evaluates the whole window.
    pub recent_window: Option<usize>,
}

impl TrendLineConfig {
    pub fn for_profile(profile: TrendLineProfile) -> Self {
        let mut config = Self {
            min_touches: 3,
            tolerance_percentage: 0.5,
            max_slope_angle: 85.0,
            max_lines: 5,
            strength: StrengthModel::SpanWeighted,
            max_swing_points: 250,
            recent_window: None,
        };
        config.apply_profile(profile);
        config
    }

    /// Overwrite the profile-defining fields (touches, lines, strength, evaluated window),
    /// leaving tolerance and caps untouched.
    pub fn apply_profile(&mut self, profile: TrendLineProfile) {
        match profile {
            TrendLineProfile::Standard => {
                self.min_touches = 3;
                self.max_lines = 5;
                self.strength = StrengthModel::SpanWeighted;
                self.recent_window = None;
            }
            TrendLineProfile::Advanced => {
                self.min_touches = 2;
                self.max_lines = 8;
                self.strength = StrengthModel::TouchWeighted;
                self.recent_window = Some(ADVANCED_RECENT_WINDOW);
            }
        }
    }
}

impl Default for TrendLineConfig {
    fn default() -> Self {
        Self::for_profile(TrendLineProfile::Standard)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Only order blocks whose origin lies in the last N candles produce signals.
    pub recent_candles: usize,
    /// Reward distance as a multiple of risk distance.
    pub reward_ratio: f64,
    /// Stop placed this many percent beyond the far edge of the zone.
    pub stop_buffer_percentage: f64,
    /// A signal stays active while price is within this many percent past the zone.
    pub active_band_percentage: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            recent_candles: 50,
            reward_ratio: 2.0,
            stop_buffer_percentage: 0.5,
            active_band_percentage: 2.0,
        }
    }
}

/// Parameters for every stage of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub swing: SwingConfig,
    pub structure: StructureConfig,
    pub order_block: OrderBlockConfig,
    pub trend_lines: TrendLineConfig,
    pub signals: SignalConfig,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_count("swing.period", self.swing.period, 1)?;
        check_float(
            "structure.min_move_percentage",
            self.structure.min_move_percentage,
            0.0,
            100.0,
            true,
        )?;
        check_count("order_block.lookback_period", self.order_block.lookback_period, 1)?;
        check_float(
            "order_block.min_move_percentage",
            self.order_block.min_move_percentage,
            0.0,
            100.0,
            true,
        )?;

        let tl = &self.trend_lines;
        check_count("trend_lines.min_touches", tl.min_touches, 1)?;
        check_float(
            "trend_lines.tolerance_percentage",
            tl.tolerance_percentage,
            0.0,
            100.0,
            false,
        )?;
        check_float("trend_lines.max_slope_angle", tl.max_slope_angle, 0.0, 90.0, false)?;
        check_count("trend_lines.max_lines", tl.max_lines, 1)?;
        check_count("trend_lines.max_swing_points", tl.max_swing_points, 2)?;
        if let Some(window) = tl.recent_window {
            check_count("trend_lines.recent_window", window, 2)?;
        }

        let s = &self.signals;
        check_count("signals.recent_candles", s.recent_candles, 1)?;
        check_float("signals.reward_ratio", s.reward_ratio, 0.0, 100.0, false)?;
        check_float(
            "signals.stop_buffer_percentage",
            s.stop_buffer_percentage,
            0.0,
            100.0,
            true,
        )?;
        check_float(
            "signals.active_band_percentage",
            s.active_band_percentage,
            0.0,
            100.0,
            true,
        )?;
        Ok(())
    }
}
