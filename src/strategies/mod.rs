//! Strategy evaluators and the catalogs that build them.

pub mod catalog;
pub mod evaluator;

pub use catalog::{ConfigStrategyCatalog, StaticStrategyCatalog, StrategyCatalog};
pub use evaluator::StrategyEvaluator;
