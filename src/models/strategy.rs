//! Strategy definition data models

use crate::models::evaluation::EvaluatorCategory;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Name accepted in `required_evaluators` meaning "every evaluator"
pub const EVALUATORS_WILDCARD: &str = "*";

/// Strategy entry as it appears in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyDefinition {
    pub name: String,
    pub required_categories: BTreeSet<EvaluatorCategory>,
    #[serde(default)]
    pub required_evaluators: EvaluatorFilter,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Which evaluators a strategy listens to, by name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum EvaluatorFilter {
    #[default]
    Wildcard,
    Named(BTreeSet<String>),
}

impl EvaluatorFilter {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EvaluatorFilter::from(names.into_iter().map(Into::into).collect::<Vec<String>>())
    }

    /// Whether an evaluator with this name passes the filter
    pub fn matches(&self, evaluator_name: &str) -> bool {
        match self {
            EvaluatorFilter::Wildcard => true,
            EvaluatorFilter::Named(names) => names.contains(evaluator_name),
        }
    }
}

impl From<Vec<String>> for EvaluatorFilter {
    fn from(names: Vec<String>) -> Self {
        if names.is_empty() || names.iter().any(|n| n == EVALUATORS_WILDCARD) {
            EvaluatorFilter::Wildcard
        } else {
            EvaluatorFilter::Named(names.into_iter().collect())
        }
    }
}

impl From<EvaluatorFilter> for Vec<String> {
    fn from(filter: EvaluatorFilter) -> Self {
        match filter {
            EvaluatorFilter::Wildcard => vec![EVALUATORS_WILDCARD.to_string()],
            EvaluatorFilter::Named(names) => names.into_iter().collect(),
        }
    }
}

/// How a strategy combines the notes of its evaluators
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub method: AggregationMethod,
    /// Per-evaluator weights, only read by `WeightedAverage` (missing = 1.0)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub weights: HashMap<String, f64>,
}

/// Aggregation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    #[default]
    Average,
    WeightedAverage,
    Majority,
    Unanimous,
    Strongest,
}
