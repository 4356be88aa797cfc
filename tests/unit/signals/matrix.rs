//! Unit tests for the evaluation matrix

use evalgrid::models::{EvalNote, EvaluatorCategory, TimeFrame};
use evalgrid::signals::matrix::{EvaluationMatrix, MatrixKey};
use std::sync::Arc;

#[test]
fn test_missing_entry_reads_pending() {
    let matrix = EvaluationMatrix::new();
    assert!(matrix.is_empty());
    assert!(matrix.get(EvaluatorCategory::Technical, "rsi").is_pending());
    assert!(!matrix.contains(&MatrixKey::new(EvaluatorCategory::Technical, "rsi")));
}

#[test]
fn test_time_frames_are_separate_entries() {
    let matrix = EvaluationMatrix::new();
    matrix.set_for_time_frame(
        EvaluatorCategory::Technical,
        "rsi",
        Some(TimeFrame::OneHour),
        EvalNote::new(0.5),
    );
    matrix.set_for_time_frame(
        EvaluatorCategory::Technical,
        "rsi",
        Some(TimeFrame::FourHours),
        EvalNote::new(-0.5),
    );

    assert_eq!(matrix.len(), 2);
    assert_eq!(
        matrix.get_for_time_frame(EvaluatorCategory::Technical, "rsi", Some(TimeFrame::OneHour)),
        EvalNote::Value(0.5)
    );
    assert_eq!(
        matrix.get_for_time_frame(EvaluatorCategory::Technical, "rsi", Some(TimeFrame::FourHours)),
        EvalNote::Value(-0.5)
    );
    assert!(matrix.get(EvaluatorCategory::Technical, "rsi").is_pending());
}

#[test]
fn test_entries_filter_by_category() {
    let matrix = EvaluationMatrix::new();
    matrix.set(EvaluatorCategory::Social, "news", EvalNote::new(0.1));
    matrix.set(EvaluatorCategory::RealTime, "book", EvalNote::new(0.2));
    matrix.set(EvaluatorCategory::Strategy, "trend", EvalNote::Pending);

    let social = matrix.entries(EvaluatorCategory::Social);
    assert_eq!(social.len(), 1);
    assert_eq!(
        social.get(&MatrixKey::new(EvaluatorCategory::Social, "news")),
        Some(&EvalNote::Value(0.1))
    );
    assert_eq!(matrix.snapshot().len(), 3);
}

#[test]
fn test_writer_only_touches_its_key() {
    let matrix = Arc::new(EvaluationMatrix::new());
    matrix.set(EvaluatorCategory::RealTime, "trades", EvalNote::new(0.9));

    let key = MatrixKey::new(EvaluatorCategory::RealTime, "book");
    let writer = matrix.writer(key.clone());
    writer.write(EvalNote::new(-0.3));

    assert_eq!(writer.key(), &key);
    assert_eq!(writer.read(), EvalNote::Value(-0.3));
    assert_eq!(matrix.get(EvaluatorCategory::RealTime, "trades"), EvalNote::Value(0.9));
}

#[test]
fn test_key_display() {
    let key = MatrixKey::new(EvaluatorCategory::Technical, "rsi")
        .with_time_frame(Some(TimeFrame::OneHour));
    assert_eq!(key.to_string(), "technical/rsi@1h");
}

#[test]
fn test_set_leaves_other_entries_untouched() {
    let matrix = EvaluationMatrix::new();
    matrix.set(EvaluatorCategory::Technical, "macd", EvalNote::new(-0.4));
    matrix.set(EvaluatorCategory::Strategy, "trend", EvalNote::new(0.6));
    let before = matrix.snapshot();

    matrix.set(EvaluatorCategory::Technical, "rsi", EvalNote::new(0.8));
    matrix.set(EvaluatorCategory::Technical, "rsi", EvalNote::new(0.1));

    assert_eq!(matrix.get(EvaluatorCategory::Technical, "rsi"), EvalNote::Value(0.1));
    assert_eq!(matrix.get(EvaluatorCategory::Technical, "macd"), EvalNote::Value(-0.4));
    assert_eq!(matrix.get(EvaluatorCategory::Strategy, "trend"), EvalNote::Value(0.6));
    let after = matrix.snapshot();
    for (key, note) in &before {
        assert_eq!(after.get(key), Some(note));
    }
    assert_eq!(after.len(), before.len() + 1);
}

#[test]
fn test_remove_entry() {
    let matrix = EvaluationMatrix::new();
    matrix.set(EvaluatorCategory::Technical, "rsi", EvalNote::new(0.2));
    let key = MatrixKey::new(EvaluatorCategory::Technical, "rsi");

    assert_eq!(matrix.remove(&key), Some(EvalNote::Value(0.2)));
    assert_eq!(matrix.remove(&key), None);
    assert!(matrix.get_key(&key).is_pending());
}
