//! Score normalization helpers for workers producing raw indicator values

use crate::models::{MAX_NOTE, MIN_NOTE};

/// Normalize a value to -1 to +1 range
///
/// For indicators that output values in different ranges, this converts them
/// to a standardized -1 (bearish) to +1 (bullish) scale
pub fn normalize_score(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    let normalized = 2.0 * ((value - min) / (max - min)) - 1.0;
    normalized.clamp(MIN_NOTE, MAX_NOTE)
}

/// Normalize RSI (0-100) to a note; oversold reads bullish, overbought bearish
pub fn normalize_rsi(rsi: f64) -> f64 {
    -normalize_score(rsi, 0.0, 100.0)
}

/// Direction of a note ignoring weak readings below `dead_zone`
pub fn note_sign(value: f64, dead_zone: f64) -> i8 {
    if value > dead_zone {
        1
    } else if value < -dead_zone {
        -1
    } else {
        0
    }
}
