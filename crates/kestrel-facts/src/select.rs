//! Selection of the best reported item for a tag.
//!
//! A tag's unit list usually carries many items for the same metric:
//! different period end dates, different form types, quarter-to-date
//! versus year-to-date versus fiscal-year aggregation. The selector
//! ranks them under a caller-chosen frame preference and returns the
//! single best item.

use crate::model::FactItem;
use chrono::NaiveDate;

/// Aggregation-frame preference for flow metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FramePreference {
    /// No stated preference; year-to-date-with-quarter frames rank first,
    /// mirroring how flow metrics are usually reported
    #[default]
    Any,
    /// Prefer quarter-to-date frames
    Qtd,
    /// Prefer year-to-date frames
    Ytd,
    /// Prefer fiscal-year / calendar-year frames
    Fy,
}

impl FramePreference {
    /// Parse a preference label leniently; unrecognized labels fall back
    /// to [`FramePreference::Any`].
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "ytd" => Self::Ytd,
            "qtd" | "quarter" => Self::Qtd,
            "fy" => Self::Fy,
            _ => Self::Any,
        }
    }
}

impl std::fmt::Display for FramePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Any => "ANY",
            Self::Qtd => "QTD",
            Self::Ytd => "YTD",
            Self::Fy => "FY",
        };
        f.write_str(label)
    }
}

/// Rank a frame label under a preference; 0 is best, 3 is worst.
///
/// Checks are case-insensitive substring tests in a fixed order, so a
/// frame like "CY2024Q2QTD" reads as quarter-to-date before its "CY"
/// prefix can classify it as calendar-year. Unlabeled frames always rank
/// worst regardless of preference.
fn frame_rank(frame: Option<&str>, preference: FramePreference) -> u8 {
    let Some(frame) = frame.filter(|f| !f.is_empty()) else {
        return 3;
    };
    let f = frame.to_uppercase();
    let has = |needle: &str| f.contains(needle);

    match preference {
        FramePreference::Ytd => {
            if has("YTD") && has("Q") {
                0
            } else if has("QTD") {
                1
            } else if has("FY") || has("CY") {
                2
            } else {
                3
            }
        }
        FramePreference::Qtd => {
            if has("QTD") {
                0
            } else if has("YTD") && has("Q") {
                1
            } else if has("FY") || has("CY") {
                2
            } else {
                3
            }
        }
        FramePreference::Fy => {
            if has("FY") || has("CY") {
                0
            } else if has("YTD") && has("Q") {
                1
            } else if has("QTD") || has("Q") {
                2
            } else {
                3
            }
        }
        FramePreference::Any => {
            if has("Q") && has("YTD") {
                0
            } else if has("QTD") || has("Q") {
                1
            } else if has("FY") || has("CY") {
                2
            } else {
                3
            }
        }
    }
}

/// Period date used for ordering: end date, else filed date, else the
/// epoch minimum so undated items sort last.
fn item_date(item: &FactItem) -> NaiveDate {
    item.end
        .as_deref()
        .or(item.filed.as_deref())
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or(NaiveDate::MIN)
}

/// Composite ranking key; larger is better on every component, compared
/// lexicographically (date dominates, then form, then frame).
fn ranking_key(
    item: &FactItem,
    prefer_quarterly: bool,
    preference: FramePreference,
) -> (NaiveDate, u8, u8) {
    let form = item.form.as_deref().unwrap_or_default().to_uppercase();
    let form_score = u8::from(form == "10-Q" || form == "10-K");

    // Stock (balance-sheet) metrics are point-in-time; a frame label is
    // not meaningful for them, so frame scoring collapses to a constant
    // and the end date alone drives the ordering.
    let frame_score = if prefer_quarterly {
        100 - frame_rank(item.frame.as_deref(), preference)
    } else {
        98
    };

    (item_date(item), form_score, frame_score)
}

/// Pick the best reported item from a tag's unit list.
///
/// Ranking, in descending priority: later period date, 10-Q/10-K over
/// other form types, then frame preference (flow metrics only; pass
/// `prefer_quarterly = false` for balance-sheet metrics). Exact ties keep
/// the first occurrence in input order, which makes selection
/// deterministic for a fixed document.
pub fn select_latest<'a>(
    items: &'a [FactItem],
    prefer_quarterly: bool,
    preference: FramePreference,
) -> Option<&'a FactItem> {
    let mut best: Option<(&FactItem, (NaiveDate, u8, u8))> = None;
    for item in items {
        let key = ranking_key(item, prefer_quarterly, preference);
        if best.as_ref().is_none_or(|(_, best_key)| key > *best_key) {
            best = Some((item, key));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn item(val: f64, end: &str, form: &str, frame: Option<&str>) -> FactItem {
        FactItem {
            val,
            end: Some(end.to_string()),
            start: None,
            accn: None,
            fy: None,
            fp: None,
            form: Some(form.to_string()),
            filed: None,
            frame: frame.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_list() {
        assert!(select_latest(&[], true, FramePreference::Any).is_none());
    }

    #[rstest]
    #[case(FramePreference::Qtd, 200_000_000.0)]
    #[case(FramePreference::Ytd, 600_000_000.0)]
    #[case(FramePreference::Any, 600_000_000.0)]
    fn frame_policy_selects_expected_item(
        #[case] preference: FramePreference,
        #[case] expected: f64,
    ) {
        let items = vec![
            item(200_000_000.0, "2024-06-30", "10-Q", Some("CY2024Q2QTD")),
            item(600_000_000.0, "2024-06-30", "10-Q", Some("CY2024Q2YTD")),
        ];

        let best = select_latest(&items, true, preference).unwrap();
        assert_eq!(best.val, expected);
    }

    #[test]
    fn test_later_date_dominates_frame() {
        let items = vec![
            item(100.0, "2024-06-30", "10-Q", Some("CY2024Q2QTD")),
            item(200.0, "2024-03-31", "10-Q", Some("CY2024Q1QTD")),
        ];
        let best = select_latest(&items, true, FramePreference::Qtd).unwrap();
        assert_eq!(best.val, 100.0);
    }

    #[test]
    fn test_quarterly_form_outranks_other_forms() {
        let items = vec![
            item(100.0, "2024-06-30", "8-K", Some("CY2024Q2QTD")),
            item(200.0, "2024-06-30", "10-Q", None),
        ];
        let best = select_latest(&items, true, FramePreference::Qtd).unwrap();
        assert_eq!(best.val, 200.0);
    }

    #[test]
    fn test_unlabeled_frame_ranks_worst() {
        let items = vec![
            item(100.0, "2024-06-30", "10-Q", None),
            item(200.0, "2024-06-30", "10-Q", Some("")),
            item(300.0, "2024-06-30", "10-Q", Some("CY2024Q2QTD")),
        ];
        let best = select_latest(&items, true, FramePreference::Fy).unwrap();
        // "CY..." reads as calendar-year under the FY policy; both
        // unlabeled items lose to it.
        assert_eq!(best.val, 300.0);
    }

    #[test]
    fn test_exact_tie_keeps_first_occurrence() {
        let items = vec![
            item(111.0, "2024-06-30", "10-Q", Some("CY2024Q2QTD")),
            item(222.0, "2024-06-30", "10-Q", Some("CY2024Q2QTD")),
        ];
        let best = select_latest(&items, true, FramePreference::Qtd).unwrap();
        assert_eq!(best.val, 111.0);
    }

    #[test]
    fn test_stock_metrics_ignore_frames() {
        // With frame scoring disabled, the QTD frame gives no edge; the
        // tie between equal dates falls back to input order.
        let items = vec![
            item(111.0, "2024-06-30", "10-Q", Some("CY2024Q2YTD")),
            item(222.0, "2024-06-30", "10-Q", Some("CY2024Q2QTD")),
        ];
        let best = select_latest(&items, false, FramePreference::Qtd).unwrap();
        assert_eq!(best.val, 111.0);
    }

    #[test]
    fn test_filed_date_used_when_end_missing() {
        let undated = FactItem {
            val: 999.0,
            end: None,
            start: None,
            accn: None,
            fy: None,
            fp: None,
            form: Some("10-Q".to_string()),
            filed: Some("2024-08-01".to_string()),
            frame: None,
        };
        let items = vec![item(100.0, "2024-06-30", "10-Q", None), undated];
        let best = select_latest(&items, false, FramePreference::Any).unwrap();
        // Filed date 2024-08-01 beats end date 2024-06-30.
        assert_eq!(best.val, 999.0);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let items = vec![
            item(100.0, "garbage", "10-Q", None),
            item(200.0, "2020-01-01", "10-Q", None),
        ];
        let best = select_latest(&items, false, FramePreference::Any).unwrap();
        assert_eq!(best.val, 200.0);
    }

    #[rstest]
    #[case(Some("CY2024Q2YTD"), FramePreference::Ytd, 0)]
    #[case(Some("CY2024Q2QTD"), FramePreference::Ytd, 1)]
    #[case(Some("CY2024"), FramePreference::Ytd, 2)]
    #[case(None, FramePreference::Ytd, 3)]
    #[case(Some("CY2024Q2QTD"), FramePreference::Qtd, 0)]
    #[case(Some("CY2024Q2YTD"), FramePreference::Qtd, 1)]
    #[case(Some("CY2024"), FramePreference::Fy, 0)]
    #[case(Some("CY2024Q2QTD"), FramePreference::Fy, 0)] // "CY" prefix wins first check
    #[case(Some("CY2024Q2YTD"), FramePreference::Any, 0)]
    #[case(Some("CY2024Q2QTD"), FramePreference::Any, 1)]
    #[case(Some(""), FramePreference::Any, 3)]
    fn frame_rank_table(
        #[case] frame: Option<&str>,
        #[case] preference: FramePreference,
        #[case] expected: u8,
    ) {
        assert_eq!(frame_rank(frame, preference), expected);
    }

    #[rstest]
    #[case("ytd", FramePreference::Ytd)]
    #[case("QTD", FramePreference::Qtd)]
    #[case("quarter", FramePreference::Qtd)]
    #[case("fy", FramePreference::Fy)]
    #[case("any", FramePreference::Any)]
    #[case("unknown", FramePreference::Any)]
    fn from_label_table(#[case] label: &str, #[case] expected: FramePreference) {
        assert_eq!(FramePreference::from_label(label), expected);
    }
}
