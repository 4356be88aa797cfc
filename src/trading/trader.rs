//! Traders bound to an exchange, read by the decision layer

use crate::config::{Config, SIMULATOR_ENABLED_PATH, SIMULATOR_RISK_PATH};
use crate::error::ConfigError;
use crate::models::ExchangeId;
use tracing::info;

pub trait Trader: Send + Sync {
    fn exchange(&self) -> &ExchangeId;

    fn is_simulated(&self) -> bool;

    fn is_enabled(&self) -> bool;

    /// Fraction of the portfolio the trader may engage, in `[0, 1]`
    fn risk(&self) -> f64;
}

/// Paper trader configured from the `simulator` section
#[derive(Debug, Clone)]
pub struct TraderSimulator {
    exchange: ExchangeId,
    enabled: bool,
    risk: f64,
}

impl TraderSimulator {
    pub fn new(config: &Config, exchange: ExchangeId) -> Result<Self, ConfigError> {
        let enabled = config.get_bool(SIMULATOR_ENABLED_PATH)?;
        let risk = config.get_f64(SIMULATOR_RISK_PATH)?;
        if !(0.0..=1.0).contains(&risk) {
            return Err(ConfigError::InvalidValue {
                path: SIMULATOR_RISK_PATH.to_string(),
                reason: format!("risk {} outside [0, 1]", risk),
            });
        }

        info!(
            exchange = %exchange,
            enabled = enabled,
            risk = risk,
            "TraderSimulator: created for {}",
            exchange
        );

        Ok(Self {
            exchange,
            enabled,
            risk,
        })
    }
}

impl Trader for TraderSimulator {
    fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn risk(&self) -> f64 {
        self.risk
    }
}
