use crate::models::{ExchangeId, TimeFrame};
use thiserror::Error;

/// Configuration problems. All of them are fatal for the symbol being set up.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Please specify a trading mode in your config file (trader -> mode)")]
    MissingTradingMode,

    #[error("Unknown trading mode '{0}' (trader -> mode)")]
    UnknownTradingMode(String),

    #[error("Trading mode '{mode}' failed to initialize: {reason}")]
    TradingModeInit { mode: String, reason: String },

    #[error("Missing config section: {0}")]
    MissingSection(String),

    #[error("Invalid value at {path}: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("Invalid strategy definition: {0}")]
    InvalidStrategy(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors surfaced by the coordinator to its callers
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Exchange not registered: {0}")]
    UnknownExchange(ExchangeId),

    #[error("Strategy '{strategy}' not found on exchange {exchange}")]
    UnknownStrategy {
        exchange: ExchangeId,
        strategy: String,
    },

    #[error("No refresh controller for time frame {time_frame} on exchange {exchange}")]
    UnknownRefreshController {
        exchange: ExchangeId,
        time_frame: TimeFrame,
    },

    #[error("No trader bound for exchange {0}")]
    MissingTrader(ExchangeId),
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;
