//! Read-only nested configuration and environment helpers
//!
//! Files are JSON. `EVALGRID_`-prefixed environment variables override file
//! values, with `__` separating nesting levels (`EVALGRID_SIMULATOR__RISK`).

use crate::error::ConfigError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Path of the trading mode identifier
pub const TRADER_MODE_PATH: &str = "trader.mode";
/// Path of the strategy definitions list
pub const STRATEGIES_PATH: &str = "evaluator.strategies";
pub const SIMULATOR_ENABLED_PATH: &str = "simulator.enabled";
pub const SIMULATOR_RISK_PATH: &str = "simulator.risk";

/// Prefix of overriding environment variables
pub const ENV_PREFIX: &str = "EVALGRID";

/// Nested configuration mapping, read at registration time only
#[derive(Debug, Clone, Default)]
pub struct Config {
    inner: config::Config,
}

impl Config {
    /// In-memory configuration from a JSON object. Environment variables are
    /// not consulted.
    pub fn new(root: Value) -> Result<Self, ConfigError> {
        root.to_string().parse()
    }

    /// Load a JSON configuration file, then apply environment overrides
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Json))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: builder.build()?,
        })
    }

    /// Lookup by dot separated path, e.g. `trader.mode`
    pub fn get_path(&self, path: &str) -> Option<Value> {
        self.inner.get::<Value>(path).ok()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get_path(path).is_some()
    }

    /// Like [`Config::get_path`] but a missing node is an error
    pub fn section(&self, path: &str) -> Result<Value, ConfigError> {
        self.section_as(path)
    }

    /// Deserialize the node at `path` into a typed value
    pub fn section_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        self.inner
            .get::<T>(path)
            .map_err(|e| lookup_error(path, e))
    }

    pub fn get_bool(&self, path: &str) -> Result<bool, ConfigError> {
        self.inner.get_bool(path).map_err(|e| lookup_error(path, e))
    }

    pub fn get_f64(&self, path: &str) -> Result<f64, ConfigError> {
        self.inner.get_float(path).map_err(|e| lookup_error(path, e))
    }

    /// Trading mode identifier under `trader.mode`
    pub fn trading_mode(&self) -> Result<String, ConfigError> {
        self.inner
            .get_string(TRADER_MODE_PATH)
            .ok()
            .filter(|mode| !mode.is_empty())
            .ok_or(ConfigError::MissingTradingMode)
    }
}

fn lookup_error(path: &str, error: config::ConfigError) -> ConfigError {
    match error {
        config::ConfigError::NotFound(_) => ConfigError::MissingSection(path.to_string()),
        other => ConfigError::InvalidValue {
            path: path.to_string(),
            reason: other.to_string(),
        },
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::build(config::Config::builder().add_source(File::from_str(s, FileFormat::Json)))
    }
}

/// Runtime environment name (`APP_ENV`), `sandbox` when unset
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Config file location from `EVALGRID_CONFIG`, if set
pub fn get_config_path() -> Option<PathBuf> {
    env::var("EVALGRID_CONFIG").ok().map(PathBuf::from)
}
