pub mod config;
pub mod core;
pub mod error;
pub mod evaluators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod signals;
pub mod strategies;
pub mod trading;

pub use crate::core::{Coordinator, CoordinatorRuntime, RefreshController, TimeFrameRefresher};
pub use crate::error::{ConfigError, CoordinatorError, Result};
