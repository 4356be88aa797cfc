//! Trading modes and the deciders they expose
//!
//! Modes are resolved from `trader.mode` through an explicit registry of
//! factories; an unknown identifier is a configuration error.

use crate::config::Config;
use crate::error::ConfigError;
use crate::models::ExchangeId;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Downstream decision consumer signalled once evaluations are final
pub trait Decider: Send + Sync {
    fn name(&self) -> &str;

    /// Schedule a decision pass. Must not block.
    fn enqueue(&self);
}

/// Trading mode bound to one (symbol, exchange)
pub trait TradingMode: Send + Sync {
    fn name(&self) -> &str;

    fn deciders(&self) -> Vec<Arc<dyn Decider>>;
}

/// Builds a trading mode for a symbol on an exchange
pub type TradingModeFactory = Arc<
    dyn Fn(&Config, &str, &ExchangeId) -> Result<Arc<dyn TradingMode>, ConfigError>
        + Send
        + Sync,
>;

#[derive(Default, Clone)]
pub struct TradingModeRegistry {
    factories: BTreeMap<String, TradingModeFactory>,
}

impl TradingModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, mode: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Config, &str, &ExchangeId) -> Result<Arc<dyn TradingMode>, ConfigError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(mode.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, mode: &str) -> bool {
        self.factories.contains_key(mode)
    }

    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Resolve the factory named by `trader.mode`
    pub fn resolve(&self, config: &Config) -> Result<ResolvedTradingMode, ConfigError> {
        let mode = config.trading_mode()?;
        let factory = self
            .factories
            .get(&mode)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownTradingMode(mode.clone()))?;
        Ok(ResolvedTradingMode { mode, factory })
    }
}

impl fmt::Debug for TradingModeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TradingModeRegistry")
            .field("modes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A validated mode identifier and its factory
#[derive(Clone)]
pub struct ResolvedTradingMode {
    mode: String,
    factory: TradingModeFactory,
}

impl ResolvedTradingMode {
    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn build(
        &self,
        config: &Config,
        symbol: &str,
        exchange: &ExchangeId,
    ) -> Result<Arc<dyn TradingMode>, ConfigError> {
        (self.factory)(config, symbol, exchange)
    }
}

impl fmt::Debug for ResolvedTradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTradingMode")
            .field("mode", &self.mode)
            .finish()
    }
}

/// Decider backed by a wake-up notification and a pending counter
#[derive(Debug)]
pub struct QueuedDecider {
    name: String,
    pending: AtomicU64,
    total: AtomicU64,
    notify: Notify,
}

impl QueuedDecider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pending: AtomicU64::new(0),
            total: AtomicU64::new(0),
            notify: Notify::new(),
        }
    }

    /// Enqueued and not yet taken
    pub fn pending(&self) -> u64 {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn total_enqueued(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    /// Consume all pending requests, returning how many there were
    pub fn take_pending(&self) -> u64 {
        self.pending.swap(0, Ordering::SeqCst)
    }

    /// Wait until at least one request is pending, then take them all
    pub async fn next_batch(&self) -> u64 {
        loop {
            let taken = self.take_pending();
            if taken > 0 {
                return taken;
            }
            self.notify.notified().await;
        }
    }
}

impl Decider for QueuedDecider {
    fn name(&self) -> &str {
        &self.name
    }

    fn enqueue(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
        self.notify.notify_one();
    }
}

/// Trading mode with a fixed decider list
pub struct StaticTradingMode {
    name: String,
    deciders: Vec<Arc<dyn Decider>>,
}

impl StaticTradingMode {
    pub fn new(name: impl Into<String>, deciders: Vec<Arc<dyn Decider>>) -> Self {
        Self {
            name: name.into(),
            deciders,
        }
    }
}

impl TradingMode for StaticTradingMode {
    fn name(&self) -> &str {
        &self.name
    }

    fn deciders(&self) -> Vec<Arc<dyn Decider>> {
        self.deciders.clone()
    }
}
