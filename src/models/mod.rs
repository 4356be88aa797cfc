//! Shared data models spanning the engine layers.

pub mod evaluation;
pub mod exchange;
pub mod strategy;

pub use evaluation::{EvalNote, EvaluatorCategory, TimeFrame, MAX_NOTE, MIN_NOTE};
pub use exchange::ExchangeId;
pub use strategy::{
    AggregationConfig, AggregationMethod, EvaluatorFilter, StrategyDefinition,
    EVALUATORS_WILDCARD,
};
