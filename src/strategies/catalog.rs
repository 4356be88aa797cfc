//! Strategy catalogs: where an exchange session gets its strategy list from

use crate::config::{Config, STRATEGIES_PATH};
use crate::error::ConfigError;
use crate::models::{ExchangeId, StrategyDefinition};
use crate::strategies::evaluator::StrategyEvaluator;
use std::collections::HashSet;
use tracing::warn;

/// Produces a fresh strategy list for each exchange session
pub trait StrategyCatalog: Send + Sync {
    fn create_strategies(
        &self,
        config: &Config,
        exchange: &ExchangeId,
    ) -> Result<Vec<StrategyEvaluator>, ConfigError>;
}

/// Reads definitions from `evaluator.strategies`
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStrategyCatalog;

impl StrategyCatalog for ConfigStrategyCatalog {
    fn create_strategies(
        &self,
        config: &Config,
        exchange: &ExchangeId,
    ) -> Result<Vec<StrategyEvaluator>, ConfigError> {
        if !config.contains(STRATEGIES_PATH) {
            warn!(
                exchange = %exchange,
                "ConfigStrategyCatalog: no strategies configured under {}",
                STRATEGIES_PATH
            );
            return Ok(Vec::new());
        }
        let definitions: Vec<StrategyDefinition> = config.section_as(STRATEGIES_PATH)?;
        build_strategies(definitions)
    }
}

/// Fixed set of definitions, independent of configuration
#[derive(Debug, Default, Clone)]
pub struct StaticStrategyCatalog {
    definitions: Vec<StrategyDefinition>,
}

impl StaticStrategyCatalog {
    pub fn new(definitions: Vec<StrategyDefinition>) -> Self {
        Self { definitions }
    }
}

impl StrategyCatalog for StaticStrategyCatalog {
    fn create_strategies(
        &self,
        _config: &Config,
        _exchange: &ExchangeId,
    ) -> Result<Vec<StrategyEvaluator>, ConfigError> {
        build_strategies(self.definitions.clone())
    }
}

fn build_strategies(
    definitions: Vec<StrategyDefinition>,
) -> Result<Vec<StrategyEvaluator>, ConfigError> {
    let mut seen = HashSet::new();
    definitions
        .into_iter()
        .map(|definition| {
            if !seen.insert(definition.name.clone()) {
                return Err(ConfigError::InvalidStrategy(format!(
                    "duplicate strategy name {}",
                    definition.name
                )));
            }
            StrategyEvaluator::from_definition(definition)
        })
        .collect()
}
