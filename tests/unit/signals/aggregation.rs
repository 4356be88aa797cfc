//! Unit tests for note aggregation

use evalgrid::models::{AggregationConfig, AggregationMethod};
use evalgrid::signals::aggregation::{Aggregator, NoteInput};
use std::collections::HashMap;

fn config(method: AggregationMethod) -> AggregationConfig {
    AggregationConfig {
        method,
        weights: HashMap::new(),
    }
}

fn inputs(values: &[(&str, f64)]) -> Vec<NoteInput> {
    values.iter().map(|(n, v)| NoteInput::new(*n, *v)).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_empty_inputs_are_neutral() {
    for method in [
        AggregationMethod::Average,
        AggregationMethod::WeightedAverage,
        AggregationMethod::Majority,
        AggregationMethod::Unanimous,
        AggregationMethod::Strongest,
    ] {
        assert_eq!(Aggregator::aggregate(&[], &config(method)), 0.0);
    }
}

#[test]
fn test_average() {
    let notes = inputs(&[("rsi", 0.6), ("ema", 0.2), ("macd", -0.2)]);
    assert_close(
        Aggregator::aggregate(&notes, &config(AggregationMethod::Average)),
        0.2,
    );
}

#[test]
fn test_weighted_average_defaults_missing_weights() {
    let notes = inputs(&[("rsi", 1.0), ("ema", -0.5)]);
    let mut cfg = config(AggregationMethod::WeightedAverage);
    cfg.weights.insert("rsi".to_string(), 3.0);

    // (1.0 * 3 - 0.5 * 1) / 4
    assert_close(Aggregator::aggregate(&notes, &cfg), 0.625);
}

#[test]
fn test_weighted_average_zero_weights() {
    let notes = inputs(&[("rsi", 1.0)]);
    let mut cfg = config(AggregationMethod::WeightedAverage);
    cfg.weights.insert("rsi".to_string(), 0.0);
    assert_eq!(Aggregator::aggregate(&notes, &cfg), 0.0);
}

#[test]
fn test_majority_counts_directions() {
    let notes = inputs(&[("a", 0.1), ("b", 0.9), ("c", -0.4), ("d", 0.0)]);
    assert_close(
        Aggregator::aggregate(&notes, &config(AggregationMethod::Majority)),
        0.25,
    );
}

#[test]
fn test_unanimous_requires_agreement() {
    let agree = inputs(&[("a", 0.4), ("b", 0.8)]);
    assert_close(
        Aggregator::aggregate(&agree, &config(AggregationMethod::Unanimous)),
        0.6,
    );

    let split = inputs(&[("a", 0.4), ("b", -0.8)]);
    assert_eq!(
        Aggregator::aggregate(&split, &config(AggregationMethod::Unanimous)),
        0.0
    );

    let flat = inputs(&[("a", 0.0), ("b", 0.0)]);
    assert_eq!(
        Aggregator::aggregate(&flat, &config(AggregationMethod::Unanimous)),
        0.0
    );
}

#[test]
fn test_strongest_keeps_sign() {
    let notes = inputs(&[("a", 0.4), ("b", -0.9), ("c", 0.7)]);
    assert_close(
        Aggregator::aggregate(&notes, &config(AggregationMethod::Strongest)),
        -0.9,
    );
}

#[test]
fn test_result_is_clamped() {
    let notes = inputs(&[("a", 1.0), ("b", 1.0)]);
    let mut cfg = config(AggregationMethod::WeightedAverage);
    cfg.weights.insert("a".to_string(), -1.0);
    cfg.weights.insert("b".to_string(), 3.0);
    // (-1 + 3) / 4 stays in range, raw notes outside the range do not
    assert_close(Aggregator::aggregate(&notes, &cfg), 0.5);

    let out_of_range = inputs(&[("a", 4.0)]);
    assert_eq!(
        Aggregator::aggregate(&out_of_range, &config(AggregationMethod::Average)),
        1.0
    );
}
