//! BarLab Core: domain types, indicators, strategy policies and the execution simulator.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (bars, bar series, positions, trades)
//! - Pure indicator functions (SMA, EMA, RSI, MACD, Bollinger)
//! - The closed set of strategy policies
//! - Cost model and stop-loss / take-profit rules
//! - A single-pass, single-position execution simulator

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;

pub use domain::{Bar, BarError, BarSeries, ExitReason, Position, PositionState, Trade};
pub use engine::{simulate, CostModel, ExitRules, SimulationConfig, SimulationOutput};
pub use strategy::{
    available_strategies, Decision, DecisionPolicy, Strategy, StrategyError, StrategyInfo,
    StrategyParams, StrategyType,
};
