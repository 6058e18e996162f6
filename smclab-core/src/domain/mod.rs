//! Domain types for SMC Lab

pub mod candle;
pub mod signal;
pub mod structure;
pub mod trend_line;

pub use candle::{Candle, CandleError, CandleWindow, RawCandle};
pub use signal::{SignalDirection, SignalStatus, TradingSignal};
pub use structure::{Direction, OrderBlock, StructureBreak, SwingKind, SwingPoint};
pub use trend_line::{TrendLine, TrendLineKind};
