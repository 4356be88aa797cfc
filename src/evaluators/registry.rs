//! Per-exchange registry of evaluator workers

use crate::evaluators::worker::{EvaluatorWorker, WorkerId};
use crate::models::EvaluatorCategory;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Workers known to one exchange session, keyed by identity
#[derive(Default, Clone)]
pub struct WorkerRegistry {
    workers: BTreeMap<WorkerId, Arc<dyn EvaluatorWorker>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a worker. Returns true when the identity is new.
    pub fn insert(&mut self, worker: Arc<dyn EvaluatorWorker>) -> bool {
        self.workers.insert(worker.id(), worker).is_none()
    }

    pub fn remove(&mut self, id: &WorkerId) -> Option<Arc<dyn EvaluatorWorker>> {
        self.workers.remove(id)
    }

    pub fn get(&self, id: &WorkerId) -> Option<&Arc<dyn EvaluatorWorker>> {
        self.workers.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn EvaluatorWorker>> {
        self.workers.values()
    }

    /// Workers classified under a category
    pub fn by_category(&self, category: EvaluatorCategory) -> Vec<&Arc<dyn EvaluatorWorker>> {
        self.workers
            .values()
            .filter(|w| w.parent_categories().contains(&category))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.workers.values().filter(|w| w.is_active()).count()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}
