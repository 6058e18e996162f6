//! Fixed-ratio trade proposals anchored at order-block midpoints.
//!
//! Bullish block `(high, low)`:
//! - entry = (high + low) / 2
//! - stop = low × (1 - buffer)
//! - target = entry + ratio × (entry - stop)
//! - Active while current price <= high × (1 + band), else Missed
//!
//! Bearish blocks mirror this around the high.

use crate::config::SignalConfig;
use crate::domain::{
    Candle, Direction, OrderBlock, SignalDirection, SignalStatus, TradingSignal,
};
use crate::signals::round2;

#[derive(Debug, Clone)]
pub struct SignalSynthesizer {
    config: SignalConfig,
}

impl SignalSynthesizer {
    pub fn new(config: SignalConfig) -> Self {
        assert!(config.recent_candles >= 1, "recent_candles must be >= 1");
        assert!(
            config.reward_ratio.is_finite() && config.reward_ratio > 0.0,
            "reward_ratio must be finite and > 0"
        );
        Self { config }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// One signal per recent, well-defined order block, in order-block order.
    ///
    /// The current price is the close of the last candle; an empty window yields no
    /// signals.
    pub fn synthesize(&self, candles: &[Candle], blocks: &[OrderBlock]) -> Vec<TradingSignal> {
        let Some(last) = candles.last() else {
            return Vec::new();
        };
        let recent_start = candles.len().saturating_sub(self.config.recent_candles);

        blocks
            .iter()
            .filter(|ob| ob.origin_index >= recent_start)
            .filter_map(|ob| self.signal_for(ob, last.close))
            .collect()
    }

    /// Build the signal for a single block, or `None` when its levels are undefined.
    pub fn signal_for(&self, ob: &OrderBlock, current_price: f64) -> Option<TradingSignal> {
        if !ob.is_defined() || !current_price.is_finite() {
            return None;
        }
        let entry = ob.mid();
        if entry <= 0.0 {
            return None;
        }

        let buffer = self.config.stop_buffer_percentage / 100.0;
        let band = self.config.active_band_percentage / 100.0;
        let ratio = self.config.reward_ratio;

        let (stop_loss, take_profit, status) = match ob.direction {
            Direction::Bullish => {
                let stop = ob.low * (1.0 - buffer);
                let risk = entry - stop;
                let active = current_price <= ob.high * (1.0 + band);
                (stop, entry + ratio * risk, active)
            }
            Direction::Bearish => {
                let stop = ob.high * (1.0 + buffer);
                let risk = stop - entry;
                let active = current_price >= ob.low * (1.0 - band);
                (stop, entry - ratio * risk, active)
            }
        };
        let risk = (entry - stop_loss).abs();
        let reward = (take_profit - entry).abs();

        Some(TradingSignal {
            direction: SignalDirection::from(ob.direction),
            entry_price: entry,
            stop_loss,
            take_profit,
            risk_pct: round2(risk / entry * 100.0),
            reward_pct: round2(reward / entry * 100.0),
            status: if status {
                SignalStatus::Active
            } else {
                SignalStatus::Missed
            },
            source_order_block_index: ob.origin_index,
        })
    }
}

impl Default for SignalSynthesizer {
    fn default() -> Self {
        Self::new(SignalConfig::default())
    }
}
