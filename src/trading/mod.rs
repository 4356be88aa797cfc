//! Boundary with the decision layer: trading modes, deciders, traders.

pub mod mode;
pub mod trader;

pub use mode::{
    Decider, QueuedDecider, ResolvedTradingMode, StaticTradingMode, TradingMode,
    TradingModeFactory, TradingModeRegistry,
};
pub use trader::{Trader, TraderSimulator};
