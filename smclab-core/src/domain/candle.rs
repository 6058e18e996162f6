//! Candle — the fundamental market data unit, and the validated window it lives in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Un-indexed OHLCV record as produced by a loader, before window validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawCandle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// OHLCV candle at a fixed position in an analyzed window.
///
/// `index` is the 0-based position inside the owning [`CandleWindow`]. Every derived
/// annotation (swing points, breaks, order blocks, ...) refers back to candles by
/// this index only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Close strictly above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close strictly below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Returns true if any OHLCV field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .any(|v| !v.is_finite())
    }

    /// OHLC ordering check: `low <= open, close <= high`.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// Caller contract violations detected while building a [`CandleWindow`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CandleError {
    #[error("invalid candle at index {index}: OHLC ordering violated (o={open}, h={high}, l={low}, c={close})")]
    InvalidCandle {
        index: usize,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },

    #[error("invalid candle at index {index}: non-finite value")]
    NonFinite { index: usize },

    #[error("timestamps must be non-decreasing: index {index} ({timestamp}) precedes its predecessor")]
    NonMonotonicTimestamp {
        index: usize,
        timestamp: DateTime<Utc>,
    },
}

/// Immutable, validated, time-ordered candle sequence.
///
/// Construction assigns each candle its window index and rejects malformed input,
/// so every stage downstream can assume finite, OHLC-ordered, non-decreasing data.
/// An empty window is valid and simply yields empty analysis output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandleWindow {
    candles: Vec<Candle>,
}

impl CandleWindow {
    /// Validate raw records and index them 0..n in the given order.
    pub fn new(raw: impl IntoIterator<Item = RawCandle>) -> Result<Self, CandleError> {
        let mut candles: Vec<Candle> = Vec::new();
        for (index, r) in raw.into_iter().enumerate() {
            let candle = Candle {
                index,
                timestamp: r.timestamp,
                open: r.open,
                high: r.high,
                low: r.low,
                close: r.close,
                volume: r.volume,
            };
            if candle.is_void() {
                return Err(CandleError::NonFinite { index });
            }
            if !candle.is_sane() {
                return Err(CandleError::InvalidCandle {
                    index,
                    open: candle.open,
                    high: candle.high,
                    low: candle.low,
                    close: candle.close,
                });
            }
            if let Some(prev) = candles.last() {
                if candle.timestamp < prev.timestamp {
                    return Err(CandleError::NonMonotonicTimestamp {
                        index,
                        timestamp: candle.timestamp,
                    });
                }
            }
            candles.push(candle);
        }
        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Close of the most recent candle.
    pub fn current_price(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }
}

impl std::ops::Deref for CandleWindow {
    type Target = [Candle];

    fn deref(&self) -> &[Candle] {
        &self.candles
    }
}
