//! Evaluator workers and their registry.

pub mod registry;
pub mod worker;

pub use registry::WorkerRegistry;
pub use worker::{EvaluatorWorker, FnWorker, WorkerId};
