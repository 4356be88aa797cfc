//! Per-exchange state owned by the coordinator
//!
//! Every method here assumes the caller holds the session's lock; that lock is
//! the single exclusion domain of the exchange.

use crate::core::dependency::{strategy_inputs, DependencyIndex, WorkerSets};
use crate::core::refresher::RefreshController;
use crate::error::CoordinatorError;
use crate::evaluators::{EvaluatorWorker, WorkerId, WorkerRegistry};
use crate::models::{EvalNote, EvaluatorCategory, ExchangeId, TimeFrame};
use crate::signals::matrix::{EvaluationMatrix, MatrixKey, MatrixWriter};
use crate::strategies::StrategyEvaluator;
use crate::trading::{Decider, TradingMode};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// What an activation change did to the workers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    pub activated: BTreeSet<WorkerId>,
    pub deactivated: BTreeSet<WorkerId>,
    /// Workers of the changed strategies kept alive by another active strategy
    pub kept: BTreeSet<WorkerId>,
    /// Strategy evaluations run by the trailing re-evaluation pass
    pub evaluations: usize,
}

pub struct ExchangeSession {
    exchange: ExchangeId,
    controllers: BTreeMap<TimeFrame, Arc<dyn RefreshController>>,
    matrix: Arc<EvaluationMatrix>,
    strategies: Vec<StrategyEvaluator>,
    workers: WorkerRegistry,
    index: DependencyIndex,
    finalize_ready: bool,
    evaluation_passes: u64,
    trading_mode: Arc<dyn TradingMode>,
}

impl ExchangeSession {
    pub fn new(
        exchange: ExchangeId,
        strategies: Vec<StrategyEvaluator>,
        trading_mode: Arc<dyn TradingMode>,
    ) -> Self {
        let matrix = Arc::new(EvaluationMatrix::new());
        for strategy in &strategies {
            matrix.set(EvaluatorCategory::Strategy, strategy.name(), EvalNote::Pending);
        }
        let workers = WorkerRegistry::new();
        let index = DependencyIndex::build(&strategies, &workers);

        Self {
            exchange,
            controllers: BTreeMap::new(),
            matrix,
            strategies,
            workers,
            index,
            finalize_ready: false,
            evaluation_passes: 0,
            trading_mode,
        }
    }

    pub fn exchange(&self) -> &ExchangeId {
        &self.exchange
    }

    pub fn matrix(&self) -> &Arc<EvaluationMatrix> {
        &self.matrix
    }

    pub fn strategies(&self) -> &[StrategyEvaluator] {
        &self.strategies
    }

    pub fn strategy(&self, name: &str) -> Option<&StrategyEvaluator> {
        self.strategies.iter().find(|s| s.name() == name)
    }

    pub fn workers(&self) -> &WorkerRegistry {
        &self.workers
    }

    pub fn dependency_index(&self) -> &DependencyIndex {
        &self.index
    }

    pub fn controllers(&self) -> &BTreeMap<TimeFrame, Arc<dyn RefreshController>> {
        &self.controllers
    }

    pub fn trading_mode(&self) -> &Arc<dyn TradingMode> {
        &self.trading_mode
    }

    pub fn is_finalize_ready(&self) -> bool {
        self.finalize_ready
    }

    /// Re-evaluation passes run so far
    pub fn evaluation_passes(&self) -> u64 {
        self.evaluation_passes
    }

    /// Add (or replace) the controller of a time frame. Returns true when the
    /// time frame is new for this exchange.
    ///
    /// A replaced controller's worker is dropped from the registry, the matrix
    /// and the index unless the new controller drives the same worker.
    pub fn add_controller(&mut self, controller: Arc<dyn RefreshController>) -> bool {
        let incoming = controller.worker().id();
        match self.controllers.insert(controller.time_frame(), controller) {
            None => true,
            Some(previous) => {
                let outgoing = previous.worker();
                if outgoing.id() != incoming {
                    self.remove_worker(outgoing.as_ref());
                }
                false
            }
        }
    }

    /// Forget a worker and its matrix entry, then rebuild the dependency index
    pub fn remove_worker(&mut self, worker: &dyn EvaluatorWorker) -> bool {
        if self.workers.remove(&worker.id()).is_none() {
            return false;
        }
        self.matrix.remove(&worker.matrix_key());
        self.index = DependencyIndex::build(&self.strategies, &self.workers);
        true
    }

    /// Register a worker and rebuild the dependency index.
    ///
    /// The worker's matrix entry is created as `Pending` unless it exists.
    pub fn register_worker(&mut self, worker: Arc<dyn EvaluatorWorker>) -> MatrixWriter {
        let key = worker.matrix_key();
        if !self.matrix.contains(&key) {
            self.matrix.set_key(key.clone(), EvalNote::Pending);
        }
        self.workers.insert(worker);
        self.index = DependencyIndex::build(&self.strategies, &self.workers);
        self.matrix.writer(key)
    }

    /// Strategy re-evaluation pass.
    ///
    /// Active strategies other than `ignored` are evaluated when none of their
    /// inputs is pending; every active strategy then publishes its note.
    /// Inactive strategies publish `Pending` and are never evaluated.
    /// Returns the number of evaluations run.
    pub fn update_strategies(&mut self, ignored: Option<&str>) -> usize {
        let mut evaluations = 0;

        for strategy in self.strategies.iter_mut() {
            let key = MatrixKey::new(EvaluatorCategory::Strategy, strategy.name());

            if !strategy.is_active() {
                self.matrix.set_key(key, EvalNote::Pending);
                continue;
            }

            if ignored != Some(strategy.name()) {
                let inputs = strategy_inputs(&self.index, &self.workers, strategy.name());
                if strategy.is_evaluable(&inputs, &self.matrix) {
                    strategy.eval(&inputs, &self.matrix);
                    evaluations += 1;
                }
            }

            self.matrix.set_key(key, strategy.eval_note());
        }

        self.evaluation_passes += 1;
        evaluations
    }

    /// Activate or deactivate strategies and the workers they depend on.
    ///
    /// Workers are switched off only when no strategy still active after the
    /// change depends on them. Social workers are never switched off here.
    pub fn set_active(
        &mut self,
        strategy_names: &[&str],
        activate: bool,
    ) -> Result<ActivationReport, CoordinatorError> {
        if let Some(unknown) = strategy_names
            .iter()
            .find(|name| self.strategy(name).is_none())
        {
            return Err(CoordinatorError::UnknownStrategy {
                exchange: self.exchange.clone(),
                strategy: unknown.to_string(),
            });
        }

        let mut to_change = WorkerSets::default();
        for strategy in self
            .strategies
            .iter_mut()
            .filter(|s| strategy_names.contains(&s.name()))
        {
            self.index.collect_into(strategy.name(), &mut to_change);
            if !activate && strategy.is_active() {
                strategy.reset();
            }
            strategy.set_active(activate);
        }

        let mut to_keep = WorkerSets::default();
        for strategy in self.strategies.iter().filter(|s| s.is_active()) {
            self.index.collect_into(strategy.name(), &mut to_keep);
        }
        let to_keep = to_keep.all();

        let mut report = ActivationReport::default();

        if activate {
            for id in &to_change.social {
                if let Some(worker) = self.workers.get(id) {
                    if !worker.is_active() {
                        report.activated.insert(id.clone());
                    }
                    worker.set_active(true);
                }
            }
        }

        for id in to_change.switchable() {
            let Some(worker) = self.workers.get(&id) else {
                continue;
            };
            if activate {
                if !worker.is_active() {
                    report.activated.insert(id.clone());
                }
                worker.set_active(true);
            } else if to_keep.contains(&id) {
                report.kept.insert(id.clone());
            } else {
                if worker.is_active() {
                    worker.reset();
                    report.deactivated.insert(id.clone());
                }
                worker.set_active(false);
            }
        }

        for controller in self.controllers.values() {
            if activate {
                let worker = controller.worker();
                worker.mark_data_changed();
                worker.force_refresh();
            }
            controller.refresh_matrix(&self.matrix);
        }

        report.evaluations = self.update_strategies(None);
        Ok(report)
    }

    /// Copy the note of one controller's worker into the matrix
    pub fn refresh_from(&self, time_frame: TimeFrame) -> Result<(), CoordinatorError> {
        let controller = self.controllers.get(&time_frame).ok_or_else(|| {
            CoordinatorError::UnknownRefreshController {
                exchange: self.exchange.clone(),
                time_frame,
            }
        })?;
        controller.refresh_matrix(&self.matrix);
        Ok(())
    }

    /// Open the latch once every controller has refreshed at least once.
    /// Once open it is never checked again.
    fn check_finalize(&mut self) {
        self.finalize_ready = self
            .controllers
            .values()
            .all(|controller| controller.refreshed_count() > 0);
    }

    /// Signal every decider when the latch is open.
    /// Returns the deciders that were signalled.
    pub fn finalize(&mut self) -> Vec<Arc<dyn Decider>> {
        if !self.finalize_ready {
            self.check_finalize();
        }
        if !self.finalize_ready {
            return Vec::new();
        }

        let deciders = self.trading_mode.deciders();
        for decider in &deciders {
            decider.enqueue();
        }
        deciders
    }
}
