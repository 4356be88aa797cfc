//! Strategy → category → worker dependency index

use crate::evaluators::{WorkerId, WorkerRegistry};
use crate::models::EvaluatorCategory;
use crate::signals::matrix::MatrixKey;
use crate::strategies::StrategyEvaluator;
use std::collections::{BTreeMap, BTreeSet};

pub type CategoryBuckets = BTreeMap<EvaluatorCategory, BTreeSet<WorkerId>>;

/// Which workers feed which strategy, per category.
///
/// A worker is listed under a strategy's bucket iff it passes the strategy's
/// evaluator filter, it is classified under that category and the strategy
/// requires that category. The same worker may be listed by several
/// strategies; that sharing is what activation bookkeeping relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyIndex {
    by_strategy: BTreeMap<String, CategoryBuckets>,
}

impl DependencyIndex {
    /// Full rebuild from the current strategies and workers
    pub fn build(strategies: &[StrategyEvaluator], workers: &WorkerRegistry) -> Self {
        let mut by_strategy = BTreeMap::new();

        for strategy in strategies {
            let mut buckets: CategoryBuckets = EvaluatorCategory::worker_categories()
                .into_iter()
                .map(|category| (category, BTreeSet::new()))
                .collect();

            for worker in workers.iter() {
                if !strategy.is_relevant(worker.as_ref()) {
                    continue;
                }
                for category in strategy.shared_categories(worker.as_ref()) {
                    buckets.entry(category).or_default().insert(worker.id());
                }
            }

            by_strategy.insert(strategy.name().to_string(), buckets);
        }

        Self { by_strategy }
    }

    pub fn buckets(&self, strategy: &str) -> Option<&CategoryBuckets> {
        self.by_strategy.get(strategy)
    }

    /// Workers of one category feeding a strategy (empty when unknown)
    pub fn workers_in(&self, strategy: &str, category: EvaluatorCategory) -> BTreeSet<WorkerId> {
        self.by_strategy
            .get(strategy)
            .and_then(|buckets| buckets.get(&category))
            .cloned()
            .unwrap_or_default()
    }

    /// Every worker feeding a strategy, whatever the category
    pub fn relevant_workers(&self, strategy: &str) -> BTreeSet<WorkerId> {
        self.by_strategy
            .get(strategy)
            .map(|buckets| buckets.values().flatten().cloned().collect())
            .unwrap_or_default()
    }

    /// Add a strategy's workers to `target`, split by category
    pub fn collect_into(&self, strategy: &str, target: &mut WorkerSets) {
        if let Some(buckets) = self.by_strategy.get(strategy) {
            for (category, workers) in buckets {
                if let Some(bucket) = target.bucket_mut(*category) {
                    bucket.extend(workers.iter().cloned());
                }
            }
        }
    }

    pub fn strategies(&self) -> impl Iterator<Item = &str> {
        self.by_strategy.keys().map(String::as_str)
    }
}

/// Worker sets split by category, used to compute what changes and what stays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerSets {
    pub technical: BTreeSet<WorkerId>,
    pub real_time: BTreeSet<WorkerId>,
    pub social: BTreeSet<WorkerId>,
}

impl WorkerSets {
    /// Set holding a worker category; `None` for `Strategy`, which has no bucket
    pub fn bucket_mut(&mut self, category: EvaluatorCategory) -> Option<&mut BTreeSet<WorkerId>> {
        match category {
            EvaluatorCategory::Technical => Some(&mut self.technical),
            EvaluatorCategory::RealTime => Some(&mut self.real_time),
            EvaluatorCategory::Social => Some(&mut self.social),
            EvaluatorCategory::Strategy => None,
        }
    }

    /// Union of every category
    pub fn all(&self) -> BTreeSet<WorkerId> {
        self.technical
            .iter()
            .chain(self.real_time.iter())
            .chain(self.social.iter())
            .cloned()
            .collect()
    }

    /// Technical and real-time workers: the ones activation may switch off
    pub fn switchable(&self) -> BTreeSet<WorkerId> {
        self.technical.union(&self.real_time).cloned().collect()
    }
}

/// Matrix keys a strategy reads, resolved through the registry
pub fn strategy_inputs(
    index: &DependencyIndex,
    workers: &WorkerRegistry,
    strategy: &str,
) -> Vec<MatrixKey> {
    index
        .relevant_workers(strategy)
        .iter()
        .filter_map(|id| workers.get(id))
        .map(|worker| worker.matrix_key())
        .collect()
}
