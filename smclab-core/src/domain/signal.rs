//! Trade proposals synthesized from order blocks.

use serde::{Deserialize, Serialize};

use super::structure::Direction;

/// Which side of the market a signal proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalDirection {
    Long,
    Short,
}

impl From<Direction> for SignalDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Bullish => SignalDirection::Long,
            Direction::Bearish => SignalDirection::Short,
        }
    }
}

/// Whether price is still close enough to the zone to take the trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalStatus {
    Active,
    Missed,
}

/// Entry/stop/target levels derived from one order block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    pub direction: SignalDirection,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Distance entry -> stop as a percentage of entry, rounded to 2 decimals.
    pub risk_pct: f64,
    /// Distance entry -> target as a percentage of entry, rounded to 2 decimals.
    pub reward_pct: f64,
    pub status: SignalStatus,
    pub source_order_block_index: usize,
}

impl TradingSignal {
    pub fn is_active(&self) -> bool {
        self.status == SignalStatus::Active
    }

    /// Absolute price distance from entry to stop.
    pub fn risk(&self) -> f64 {
        (self.entry_price - self.stop_loss).abs()
    }

    /// Absolute price distance from entry to target.
    pub fn reward(&self) -> f64 {
        (self.take_profit - self.entry_price).abs()
    }
}
