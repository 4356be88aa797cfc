//! Strategy evaluator: combines a declared subset of the matrix into one note

use crate::error::ConfigError;
use crate::evaluators::EvaluatorWorker;
use crate::models::{
    AggregationConfig, EvalNote, EvaluatorCategory, EvaluatorFilter, StrategyDefinition,
};
use crate::signals::aggregation::{Aggregator, NoteInput};
use crate::signals::matrix::{EvaluationMatrix, MatrixKey};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct StrategyEvaluator {
    name: String,
    required_categories: BTreeSet<EvaluatorCategory>,
    required_evaluators: EvaluatorFilter,
    aggregation: AggregationConfig,
    active: bool,
    note: EvalNote,
    evaluations: u64,
}

impl StrategyEvaluator {
    /// Active strategy listening to every evaluator of the given categories
    pub fn new<I>(name: impl Into<String>, required_categories: I) -> Self
    where
        I: IntoIterator<Item = EvaluatorCategory>,
    {
        Self {
            name: name.into(),
            required_categories: required_categories.into_iter().collect(),
            required_evaluators: EvaluatorFilter::Wildcard,
            aggregation: AggregationConfig::default(),
            active: true,
            note: EvalNote::Pending,
            evaluations: 0,
        }
    }

    /// Build from a configuration entry, validating it
    pub fn from_definition(definition: StrategyDefinition) -> Result<Self, ConfigError> {
        if definition.name.trim().is_empty() {
            return Err(ConfigError::InvalidStrategy(
                "strategy name must not be empty".to_string(),
            ));
        }
        if definition.required_categories.is_empty() {
            return Err(ConfigError::InvalidStrategy(format!(
                "{} requires no evaluator category",
                definition.name
            )));
        }
        if definition
            .required_categories
            .contains(&EvaluatorCategory::Strategy)
        {
            return Err(ConfigError::InvalidStrategy(format!(
                "{} cannot depend on the strategy category",
                definition.name
            )));
        }

        Ok(Self {
            name: definition.name,
            required_categories: definition.required_categories,
            required_evaluators: definition.required_evaluators,
            aggregation: definition.aggregation,
            active: definition.active,
            note: EvalNote::Pending,
            evaluations: 0,
        })
    }

    pub fn with_evaluators(mut self, filter: EvaluatorFilter) -> Self {
        self.required_evaluators = filter;
        self
    }

    pub fn with_aggregation(mut self, aggregation: AggregationConfig) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required_categories(&self) -> &BTreeSet<EvaluatorCategory> {
        &self.required_categories
    }

    pub fn required_evaluators(&self) -> &EvaluatorFilter {
        &self.required_evaluators
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Forget the last evaluation
    pub fn reset(&mut self) {
        self.note = EvalNote::Pending;
    }

    pub fn eval_note(&self) -> EvalNote {
        self.note
    }

    /// Number of times the evaluation logic actually ran
    pub fn evaluation_count(&self) -> u64 {
        self.evaluations
    }

    /// Whether the worker passes this strategy's evaluator filter
    pub fn is_relevant(&self, worker: &dyn EvaluatorWorker) -> bool {
        self.required_evaluators.matches(worker.name())
    }

    /// Categories under which a relevant worker feeds this strategy
    pub fn shared_categories(&self, worker: &dyn EvaluatorWorker) -> Vec<EvaluatorCategory> {
        worker
            .parent_categories()
            .intersection(&self.required_categories)
            .copied()
            .filter(|c| *c != EvaluatorCategory::Strategy)
            .collect()
    }

    /// True when none of the inputs is still pending
    pub fn is_evaluable(&self, inputs: &[MatrixKey], matrix: &EvaluationMatrix) -> bool {
        inputs.iter().all(|key| !matrix.get_key(key).is_pending())
    }

    /// Run the aggregation over the current matrix values of `inputs`
    pub fn eval(&mut self, inputs: &[MatrixKey], matrix: &EvaluationMatrix) -> EvalNote {
        let notes: Vec<NoteInput> = inputs
            .iter()
            .filter_map(|key| {
                matrix
                    .get_key(key)
                    .value()
                    .map(|value| NoteInput::new(key.name.clone(), value))
            })
            .collect();

        self.note = EvalNote::new(Aggregator::aggregate(&notes, &self.aggregation));
        self.evaluations += 1;
        self.note
    }
}
