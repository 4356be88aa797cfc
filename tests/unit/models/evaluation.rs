//! Unit tests for evaluation primitives

use evalgrid::models::{EvalNote, EvaluatorCategory, ExchangeId, TimeFrame};
use std::str::FromStr;

#[test]
fn test_note_is_clamped() {
    assert_eq!(EvalNote::new(3.0), EvalNote::Value(1.0));
    assert_eq!(EvalNote::new(-3.0), EvalNote::Value(-1.0));
    assert!(EvalNote::new(f64::NAN).is_pending());
    assert_eq!(EvalNote::from(0.25).value(), Some(0.25));
    assert_eq!(EvalNote::default(), EvalNote::Pending);
    assert_eq!(EvalNote::Pending.to_string(), "pending");
}

#[test]
fn test_time_frame_names_round_trip() {
    for tf in TimeFrame::all() {
        assert_eq!(TimeFrame::from_str(tf.as_str()).unwrap(), tf);
    }
    assert!(TimeFrame::from_str("2m").is_err());
    assert_eq!(TimeFrame::FourHours.duration().as_secs(), 4 * 3600);
}

#[test]
fn test_time_frame_cron_expressions_parse() {
    for tf in TimeFrame::all() {
        assert!(
            cron::Schedule::from_str(tf.cron_expression()).is_ok(),
            "invalid cron for {}",
            tf
        );
    }
}

#[test]
fn test_category_serde_names() {
    assert_eq!(
        serde_json::to_string(&EvaluatorCategory::RealTime).unwrap(),
        "\"real_time\""
    );
    assert_eq!(
        serde_json::from_str::<TimeFrame>("\"1h\"").unwrap(),
        TimeFrame::OneHour
    );
    assert_eq!(EvaluatorCategory::worker_categories().len(), 3);
}

#[test]
fn test_exchange_id_is_case_insensitive() {
    assert_eq!(ExchangeId::new("Binance"), ExchangeId::from("binance"));
    assert_eq!(ExchangeId::new("KRAKEN").as_str(), "kraken");
    assert_eq!(ExchangeId::new("Kraken").to_string(), "kraken");
}

#[test]
fn test_deserialized_exchange_id_is_lowercased() {
    let id: ExchangeId = serde_json::from_str("\"Binance\"").unwrap();
    assert_eq!(id, ExchangeId::new("binance"));
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"binance\"");
}
