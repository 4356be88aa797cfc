//! Combination of evaluator notes into one strategy note

use crate::models::{AggregationConfig, AggregationMethod, MAX_NOTE, MIN_NOTE};
use crate::signals::scoring::note_sign;

/// Notes weaker than this do not count as a direction for vote-based methods
const DIRECTION_DEAD_ZONE: f64 = 1e-9;

/// Evaluator note fed into an aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct NoteInput {
    pub name: String,
    pub value: f64,
}

impl NoteInput {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

pub struct Aggregator;

impl Aggregator {
    /// Aggregate notes according to the config. No inputs reads as neutral.
    pub fn aggregate(inputs: &[NoteInput], config: &AggregationConfig) -> f64 {
        if inputs.is_empty() {
            return 0.0;
        }

        let note = match config.method {
            AggregationMethod::Average => Self::average(inputs),
            AggregationMethod::WeightedAverage => {
                let mut weighted = 0.0;
                let mut total_weight = 0.0;
                for input in inputs {
                    let weight = config.weights.get(&input.name).copied().unwrap_or(1.0);
                    weighted += input.value * weight;
                    total_weight += weight.abs();
                }
                if total_weight > 0.0 {
                    weighted / total_weight
                } else {
                    0.0
                }
            }
            AggregationMethod::Majority => {
                let votes: i64 = inputs
                    .iter()
                    .map(|i| note_sign(i.value, DIRECTION_DEAD_ZONE) as i64)
                    .sum();
                votes as f64 / inputs.len() as f64
            }
            AggregationMethod::Unanimous => {
                let first = note_sign(inputs[0].value, DIRECTION_DEAD_ZONE);
                let agree = first != 0
                    && inputs
                        .iter()
                        .all(|i| note_sign(i.value, DIRECTION_DEAD_ZONE) == first);
                if agree {
                    Self::average(inputs)
                } else {
                    0.0
                }
            }
            AggregationMethod::Strongest => inputs
                .iter()
                .map(|i| i.value)
                .fold(0.0, |best: f64, v| if v.abs() > best.abs() { v } else { best }),
        };

        note.clamp(MIN_NOTE, MAX_NOTE)
    }

    fn average(inputs: &[NoteInput]) -> f64 {
        inputs.iter().map(|i| i.value).sum::<f64>() / inputs.len() as f64
    }
}
