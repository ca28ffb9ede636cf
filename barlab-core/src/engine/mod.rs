//! Backtesting engine: cost model, protective exits and the bar-by-bar simulator.

pub mod cost_model;
pub mod exits;
pub mod simulator;

pub use cost_model::{CostModel, Side};
pub use exits::{ExitRules, ExitTrigger};
pub use simulator::{simulate, SimulationConfig, SimulationOutput};
