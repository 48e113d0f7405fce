pub mod ledger;
pub mod position;
pub mod sizer;

pub use ledger::{ExitReason, Trade, TradeLedger};
pub use position::{Direction, OpenPosition, PositionState};
pub use sizer::{size, PositionSizer};
