//! Domain types for barlab

pub mod bar;
pub mod position;
pub mod trade;

pub use bar::{Bar, BarError, BarSeries};
pub use position::{Position, PositionState};
pub use trade::{round_cents, ExitReason, Trade};
