//! Symbol-level coordinator: owns one session per exchange
//!
//! Sessions live in a concurrent map keyed by exchange; each session has its
//! own lock, so work on different exchanges never contends. The map guard is
//! always released before a session lock is taken.

use crate::config::Config;
use crate::core::dependency::DependencyIndex;
use crate::core::refresher::RefreshController;
use crate::core::session::{ActivationReport, ExchangeSession};
use crate::error::{CoordinatorError, Result};
use crate::evaluators::EvaluatorWorker;
use crate::metrics::Metrics;
use crate::models::{ExchangeId, TimeFrame};
use crate::signals::matrix::{EvaluationMatrix, MatrixWriter};
use crate::strategies::{ConfigStrategyCatalog, StrategyCatalog};
use crate::trading::{Decider, ResolvedTradingMode, Trader, TradingModeRegistry};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub type SharedSession = Arc<Mutex<ExchangeSession>>;

pub struct Coordinator {
    symbol: String,
    config: Config,
    trading_mode: ResolvedTradingMode,
    catalog: Arc<dyn StrategyCatalog>,
    sessions: DashMap<ExchangeId, SharedSession>,
    traders: RwLock<HashMap<ExchangeId, Arc<dyn Trader>>>,
    trader_simulators: RwLock<HashMap<ExchangeId, Arc<dyn Trader>>>,
    metrics: Option<Arc<Metrics>>,
}

impl Coordinator {
    /// Create the coordinator of a symbol.
    ///
    /// The trading mode is resolved here: a missing or unknown `trader.mode`
    /// aborts the symbol setup.
    pub fn new(
        symbol: impl Into<String>,
        config: Config,
        trading_modes: &TradingModeRegistry,
    ) -> Result<Self> {
        let symbol = symbol.into();
        let trading_mode = trading_modes.resolve(&config)?;

        info!(
            symbol = %symbol,
            trading_mode = %trading_mode.mode(),
            "Coordinator: created for {} with trading mode {}",
            symbol,
            trading_mode.mode()
        );

        Ok(Self {
            symbol,
            config,
            trading_mode,
            catalog: Arc::new(ConfigStrategyCatalog),
            sessions: DashMap::new(),
            traders: RwLock::new(HashMap::new()),
            trader_simulators: RwLock::new(HashMap::new()),
            metrics: None,
        })
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn StrategyCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn has_exchange(&self, exchange: &ExchangeId) -> bool {
        self.sessions.contains_key(exchange)
    }

    pub fn exchanges(&self) -> Vec<ExchangeId> {
        let mut exchanges: Vec<ExchangeId> =
            self.sessions.iter().map(|entry| entry.key().clone()).collect();
        exchanges.sort();
        exchanges
    }

    /// Session of a registered exchange
    pub fn session(&self, exchange: &ExchangeId) -> Result<SharedSession> {
        self.sessions
            .get(exchange)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| CoordinatorError::UnknownExchange(exchange.clone()))
    }

    /// Register the refresh controller of an (exchange, time frame).
    ///
    /// The first registration for an exchange builds its session: matrix,
    /// strategies, dependency index and trading mode. The controller's worker
    /// is registered with the session.
    pub fn register_refresh_controller(
        &self,
        exchange: &ExchangeId,
        controller: Arc<dyn RefreshController>,
    ) -> Result<()> {
        let session = self.get_or_create_session(exchange)?;
        let time_frame = controller.time_frame();
        let worker = controller.worker();

        let mut session = session.lock();
        let new_time_frame = session.add_controller(controller);
        session.register_worker(worker);

        info!(
            symbol = %self.symbol,
            exchange = %exchange,
            time_frame = %time_frame,
            new_time_frame = new_time_frame,
            controllers = session.controllers().len(),
            "Coordinator: refresh controller registered for {} on {}",
            time_frame,
            exchange
        );
        Ok(())
    }

    /// Register an event-driven worker (real-time, social) on a registered
    /// exchange. The returned writer only reaches the worker's own entry.
    pub fn register_worker(
        &self,
        exchange: &ExchangeId,
        worker: Arc<dyn EvaluatorWorker>,
    ) -> Result<MatrixWriter> {
        let session = self.session(exchange)?;
        let id = worker.id();
        let category = worker.category();
        let writer = session.lock().register_worker(worker);

        debug!(
            symbol = %self.symbol,
            exchange = %exchange,
            worker = %id,
            category = %category,
            "Coordinator: worker {} registered on {}",
            id,
            exchange
        );
        Ok(writer)
    }

    fn get_or_create_session(&self, exchange: &ExchangeId) -> Result<SharedSession> {
        if let Some(entry) = self.sessions.get(exchange) {
            return Ok(Arc::clone(entry.value()));
        }

        match self.sessions.entry(exchange.clone()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let strategies = self.catalog.create_strategies(&self.config, exchange)?;
                let trading_mode =
                    self.trading_mode
                        .build(&self.config, &self.symbol, exchange)?;

                info!(
                    symbol = %self.symbol,
                    exchange = %exchange,
                    strategies = strategies.len(),
                    trading_mode = %trading_mode.name(),
                    "Coordinator: session created for {} with {} strategies",
                    exchange,
                    strategies.len()
                );

                let session = Arc::new(Mutex::new(ExchangeSession::new(
                    exchange.clone(),
                    strategies,
                    trading_mode,
                )));
                Ok(Arc::clone(entry.insert(session).value()))
            }
        }
    }

    /// Run one strategy re-evaluation pass for an exchange
    pub fn update_strategies(
        &self,
        exchange: &ExchangeId,
        ignored_strategy: Option<&str>,
    ) -> Result<usize> {
        let session = self.session(exchange)?;
        let mut session = session.lock();
        Ok(self.timed_update(&mut session, ignored_strategy))
    }

    fn timed_update(&self, session: &mut ExchangeSession, ignored_strategy: Option<&str>) -> usize {
        let start = Instant::now();
        let evaluations = session.update_strategies(ignored_strategy);

        if let Some(ref metrics) = self.metrics {
            metrics
                .strategy_evaluations_total
                .inc_by(evaluations as u64);
            metrics
                .strategy_evaluation_duration_seconds
                .observe(start.elapsed().as_secs_f64());
        }

        debug!(
            exchange = %session.exchange(),
            evaluations = evaluations,
            "Coordinator: strategies re-evaluated on {}",
            session.exchange()
        );
        evaluations
    }

    /// Activate or deactivate strategies on an exchange
    pub fn set_active(
        &self,
        strategies: &[&str],
        exchange: &ExchangeId,
        activate: bool,
    ) -> Result<ActivationReport> {
        let session = self.session(exchange)?;
        let mut session = session.lock();
        let start = Instant::now();
        let report = session.set_active(strategies, activate)?;

        if let Some(ref metrics) = self.metrics {
            metrics.active_workers.set(session.workers().active_count() as i64);
            metrics
                .strategy_evaluations_total
                .inc_by(report.evaluations as u64);
            metrics
                .strategy_evaluation_duration_seconds
                .observe(start.elapsed().as_secs_f64());
        }

        info!(
            symbol = %self.symbol,
            exchange = %exchange,
            strategies = ?strategies,
            activated_workers = report.activated.len(),
            deactivated_workers = report.deactivated.len(),
            kept_workers = report.kept.len(),
            "Coordinator: {:?} activated: {}",
            strategies,
            activate
        );
        Ok(report)
    }

    /// Signal deciders once every refresh controller has completed a cycle.
    /// Returns true when deciders were signalled.
    pub fn finalize(&self, exchange: &ExchangeId) -> Result<bool> {
        let session = self.session(exchange)?;
        let mut session = session.lock();
        Ok(self.finalize_locked(&mut session))
    }

    fn finalize_locked(&self, session: &mut ExchangeSession) -> bool {
        let was_ready = session.is_finalize_ready();
        let deciders = session.finalize();

        if session.is_finalize_ready() && !was_ready {
            info!(
                symbol = %self.symbol,
                exchange = %session.exchange(),
                "Coordinator: every refresh controller completed a cycle on {}, decisions enabled",
                session.exchange()
            );
        }

        if !session.is_finalize_ready() {
            debug!(
                exchange = %session.exchange(),
                "Coordinator: finalize skipped on {}, waiting for first refresh cycles",
                session.exchange()
            );
            return false;
        }

        if let Some(ref metrics) = self.metrics {
            metrics.finalize_dispatch_total.inc();
        }
        debug!(
            exchange = %session.exchange(),
            deciders = deciders.len(),
            "Coordinator: {} deciders signalled on {}",
            deciders.len(),
            session.exchange()
        );
        true
    }

    /// Completed refresh cycle on (exchange, time frame): copy the worker's
    /// note, re-evaluate strategies, then finalize. Returns the finalize result.
    pub fn on_refresh(&self, exchange: &ExchangeId, time_frame: TimeFrame) -> Result<bool> {
        let session = self.session(exchange)?;
        let mut session = session.lock();

        if let Some(ref metrics) = self.metrics {
            metrics
                .refresh_notices_total
                .with_label_values(&[exchange.as_str(), time_frame.as_str()])
                .inc();
        }

        session.refresh_from(time_frame)?;
        self.timed_update(&mut session, None);
        Ok(self.finalize_locked(&mut session))
    }

    pub fn matrix(&self, exchange: &ExchangeId) -> Result<Arc<EvaluationMatrix>> {
        let session = self.session(exchange)?;
        let matrix = Arc::clone(session.lock().matrix());
        Ok(matrix)
    }

    pub fn deciders(&self, exchange: &ExchangeId) -> Result<Vec<Arc<dyn Decider>>> {
        let session = self.session(exchange)?;
        let deciders = session.lock().trading_mode().deciders();
        Ok(deciders)
    }

    pub fn is_finalize_ready(&self, exchange: &ExchangeId) -> Result<bool> {
        let session = self.session(exchange)?;
        let ready = session.lock().is_finalize_ready();
        Ok(ready)
    }

    pub fn evaluation_passes(&self, exchange: &ExchangeId) -> Result<u64> {
        let session = self.session(exchange)?;
        let passes = session.lock().evaluation_passes();
        Ok(passes)
    }

    /// Strategy names of an exchange, optionally only the active ones
    pub fn strategies(&self, exchange: &ExchangeId, active_only: bool) -> Result<Vec<String>> {
        let session = self.session(exchange)?;
        let session = session.lock();
        Ok(session
            .strategies()
            .iter()
            .filter(|s| !active_only || s.is_active())
            .map(|s| s.name().to_string())
            .collect())
    }

    pub fn dependency_index(&self, exchange: &ExchangeId) -> Result<DependencyIndex> {
        let session = self.session(exchange)?;
        let index = session.lock().dependency_index().clone();
        Ok(index)
    }

    pub fn refresh_controllers(
        &self,
        exchange: &ExchangeId,
    ) -> Result<BTreeMap<TimeFrame, Arc<dyn RefreshController>>> {
        let session = self.session(exchange)?;
        let controllers = session.lock().controllers().clone();
        Ok(controllers)
    }

    pub fn set_traders(&self, traders: HashMap<ExchangeId, Arc<dyn Trader>>) {
        *self.traders.write() = traders;
    }

    pub fn set_trader_simulators(&self, simulators: HashMap<ExchangeId, Arc<dyn Trader>>) {
        *self.trader_simulators.write() = simulators;
    }

    pub fn trader(&self, exchange: &ExchangeId) -> Result<Arc<dyn Trader>> {
        self.traders
            .read()
            .get(exchange)
            .cloned()
            .ok_or_else(|| CoordinatorError::MissingTrader(exchange.clone()))
    }

    pub fn trader_simulator(&self, exchange: &ExchangeId) -> Result<Arc<dyn Trader>> {
        self.trader_simulators
            .read()
            .get(exchange)
            .cloned()
            .ok_or_else(|| CoordinatorError::MissingTrader(exchange.clone()))
    }
}
