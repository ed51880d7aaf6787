//! Numeric token scanning for pattern matches without capture groups.

use once_cell::sync::Lazy;
use regex::Regex;

/// Values below this floor are discarded by the scanner: small numbers in
/// a match window are usually years, page numbers or footnote markers
/// rather than the KPI figure itself.
pub const MIN_KPI_VALUE: f64 = 100.0;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("static regex"));

/// Extract the most plausible numeric value from free text.
///
/// Currency symbols and thousands separators are stripped, every decimal
/// token is parsed, values under [`MIN_KPI_VALUE`] are dropped, and the
/// largest survivor wins.
///
/// "Largest wins" is a disambiguation heuristic, not a guarantee: when a
/// match window contains several qualifying figures (a prior-year
/// comparison, say) the scanner can pick the wrong one. Callers that need
/// precision should use an explicit capture group in their pattern.
pub fn largest_numeric_token(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();

    NUMBER
        .find_iter(&cleaned)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| *v >= MIN_KPI_VALUE)
        .fold(None, |best: Option<f64>, v| {
            Some(best.map_or(v, |b| b.max(v)))
        })
}
