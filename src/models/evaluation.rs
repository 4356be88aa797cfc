//! Evaluation primitives shared by workers, strategies and the matrix

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Lower bound of a numeric evaluation (strongly bearish)
pub const MIN_NOTE: f64 = -1.0;
/// Upper bound of a numeric evaluation (strongly bullish)
pub const MAX_NOTE: f64 = 1.0;

/// Classification of an evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorCategory {
    Technical,
    RealTime,
    Social,
    Strategy,
}

impl EvaluatorCategory {
    /// Categories produced by workers (everything but the derived strategy category)
    pub fn worker_categories() -> [EvaluatorCategory; 3] {
        [
            EvaluatorCategory::Technical,
            EvaluatorCategory::RealTime,
            EvaluatorCategory::Social,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluatorCategory::Technical => "technical",
            EvaluatorCategory::RealTime => "real_time",
            EvaluatorCategory::Social => "social",
            EvaluatorCategory::Strategy => "strategy",
        }
    }
}

impl fmt::Display for EvaluatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest evaluation of a worker or strategy
///
/// Numeric notes are clamped to `[-1, 1]`. `Pending` means nothing usable has
/// been produced yet (never written, inactive strategy, or freshly reset).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalNote {
    #[default]
    Pending,
    Value(f64),
}

impl EvalNote {
    /// Build a numeric note, clamping into the bounded range.
    /// NaN is treated as "no evaluation" and becomes `Pending`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return EvalNote::Pending;
        }
        EvalNote::Value(value.clamp(MIN_NOTE, MAX_NOTE))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, EvalNote::Pending)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            EvalNote::Pending => None,
            EvalNote::Value(v) => Some(*v),
        }
    }
}

impl From<f64> for EvalNote {
    fn from(value: f64) -> Self {
        EvalNote::new(value)
    }
}

impl fmt::Display for EvalNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalNote::Pending => f.write_str("pending"),
            EvalNote::Value(v) => write!(f, "{:.4}", v),
        }
    }
}

/// Candle time frame a technical evaluator is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeFrame {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "3m")]
    ThreeMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "12h")]
    TwelveHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    OneWeek,
}

impl TimeFrame {
    pub fn all() -> [TimeFrame; 13] {
        [
            TimeFrame::OneMinute,
            TimeFrame::ThreeMinutes,
            TimeFrame::FiveMinutes,
            TimeFrame::FifteenMinutes,
            TimeFrame::ThirtyMinutes,
            TimeFrame::OneHour,
            TimeFrame::TwoHours,
            TimeFrame::FourHours,
            TimeFrame::SixHours,
            TimeFrame::TwelveHours,
            TimeFrame::OneDay,
            TimeFrame::ThreeDays,
            TimeFrame::OneWeek,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::OneMinute => "1m",
            TimeFrame::ThreeMinutes => "3m",
            TimeFrame::FiveMinutes => "5m",
            TimeFrame::FifteenMinutes => "15m",
            TimeFrame::ThirtyMinutes => "30m",
            TimeFrame::OneHour => "1h",
            TimeFrame::TwoHours => "2h",
            TimeFrame::FourHours => "4h",
            TimeFrame::SixHours => "6h",
            TimeFrame::TwelveHours => "12h",
            TimeFrame::OneDay => "1d",
            TimeFrame::ThreeDays => "3d",
            TimeFrame::OneWeek => "1w",
        }
    }

    pub fn minutes(&self) -> u64 {
        match self {
            TimeFrame::OneMinute => 1,
            TimeFrame::ThreeMinutes => 3,
            TimeFrame::FiveMinutes => 5,
            TimeFrame::FifteenMinutes => 15,
            TimeFrame::ThirtyMinutes => 30,
            TimeFrame::OneHour => 60,
            TimeFrame::TwoHours => 120,
            TimeFrame::FourHours => 240,
            TimeFrame::SixHours => 360,
            TimeFrame::TwelveHours => 720,
            TimeFrame::OneDay => 1_440,
            TimeFrame::ThreeDays => 4_320,
            TimeFrame::OneWeek => 10_080,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.minutes() * 60)
    }

    /// Cron expression firing on every candle close of this time frame.
    /// Format: second minute hour day month weekday
    pub fn cron_expression(&self) -> &'static str {
        match self {
            TimeFrame::OneMinute => "0 * * * * *",
            TimeFrame::ThreeMinutes => "0 */3 * * * *",
            TimeFrame::FiveMinutes => "0 */5 * * * *",
            TimeFrame::FifteenMinutes => "0 */15 * * * *",
            TimeFrame::ThirtyMinutes => "0 */30 * * * *",
            TimeFrame::OneHour => "0 0 * * * *",
            TimeFrame::TwoHours => "0 0 */2 * * *",
            TimeFrame::FourHours => "0 0 */4 * * *",
            TimeFrame::SixHours => "0 0 */6 * * *",
            TimeFrame::TwelveHours => "0 0 */12 * * *",
            TimeFrame::OneDay => "0 0 0 * * *",
            TimeFrame::ThreeDays => "0 0 0 */3 * *",
            TimeFrame::OneWeek => "0 0 0 * * Mon",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeFrame::all()
            .into_iter()
            .find(|tf| tf.as_str() == s)
            .ok_or_else(|| format!("Unknown time frame '{}'", s))
    }
}
