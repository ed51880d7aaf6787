//! Scale inference for matched numeric values.

use once_cell::sync::Lazy;
use regex::Regex;

static BILLIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bbillions?\b|\bbn\b").expect("static regex"));

static THOUSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bthousands?\b").expect("static regex"));

/// Infer the multiplier that converts a matched value to millions, based
/// on scale words near the number.
///
/// Rules, checked in order against the raw matched text:
/// - whole-word "billion"/"billions"/"bn" -> 1000.0
/// - whole-word "thousand"/"thousands" -> 0.001
/// - anything else (including explicit "million"/"mm" or no scale word at
///   all) -> 1.0, on the convention that mapped figures are already
///   reported in millions
///
/// Matching is case-insensitive and anchored at word boundaries, so e.g.
/// "tons" never triggers the thousands rule. Total: never fails.
pub fn scale_to_millions(text: &str) -> f64 {
    if BILLIONS.is_match(text) {
        1000.0
    } else if THOUSANDS.is_match(text) {
        0.001
    } else {
        1.0
    }
}
