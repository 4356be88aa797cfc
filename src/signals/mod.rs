//! Evaluation matrix and note aggregation.

pub mod aggregation;
pub mod matrix;
pub mod scoring;

pub use aggregation::*;
pub use matrix::*;
pub use scoring::*;
