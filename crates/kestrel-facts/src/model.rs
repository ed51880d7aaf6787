//! Typed model of the SEC companyfacts document.
//!
//! The feed is a nested mapping of taxonomy ("us-gaap", "dei") to tag to
//! per-unit item lists, as served by
//! `https://data.sec.gov/api/xbrl/companyfacts/CIK{cik}.json`.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single reported fact value with its filing metadata.
///
/// Everything but `val` is optional: older filings omit frames, some
/// items carry no form type, and a handful lack even an end date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactItem {
    /// Reported value in the unit's base denomination (e.g. raw USD)
    pub val: f64,

    /// End date of the reporting period, `YYYY-MM-DD`
    #[serde(default)]
    pub end: Option<String>,

    /// Start date of the reporting period (absent for instant facts)
    #[serde(default)]
    pub start: Option<String>,

    /// Accession number of the filing that reported the value
    #[serde(default)]
    pub accn: Option<String>,

    /// Fiscal year
    #[serde(default)]
    pub fy: Option<i32>,

    /// Fiscal period ("FY", "Q1".."Q4")
    #[serde(default)]
    pub fp: Option<String>,

    /// Form type ("10-K", "10-Q", "8-K", ...)
    #[serde(default)]
    pub form: Option<String>,

    /// Date the value was filed, `YYYY-MM-DD`
    #[serde(default)]
    pub filed: Option<String>,

    /// Aggregation frame label (e.g. "CY2024Q2YTD")
    #[serde(default)]
    pub frame: Option<String>,
}

/// All reported items for one XBRL tag, grouped by unit label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagFacts {
    /// Human-readable label for the tag
    #[serde(default)]
    pub label: Option<String>,

    /// Longer description of the tag
    #[serde(default)]
    pub description: Option<String>,

    /// Item lists keyed by unit label ("USD", "shares", "pure", ...)
    #[serde(default)]
    pub units: HashMap<String, Vec<FactItem>>,
}

/// A full companyfacts document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFacts {
    /// CIK of the reporting entity
    #[serde(default)]
    pub cik: Option<u64>,

    /// Registered name of the entity
    #[serde(default)]
    pub entity_name: Option<String>,

    /// taxonomy -> tag -> facts
    #[serde(default)]
    pub facts: HashMap<String, HashMap<String, TagFacts>>,
}

impl CompanyFacts {
    /// Deserialize a companyfacts document from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// All facts for a tag within a taxonomy.
    pub fn tag(&self, taxonomy: &str, tag: &str) -> Option<&TagFacts> {
        self.facts.get(taxonomy)?.get(tag)
    }

    /// The item list for a tag in a specific unit.
    pub fn unit_items(&self, taxonomy: &str, tag: &str, unit: &str) -> Option<&[FactItem]> {
        self.tag(taxonomy, tag)?
            .units
            .get(unit)
            .map(Vec::as_slice)
    }
}

/// US-GAAP and DEI tag names used by the snapshot parser.
pub mod tags {
    /// Net income (loss), a flow metric
    pub const NET_INCOME: &str = "NetIncomeLoss";

    /// Interest expense, a flow metric
    pub const INTEREST_EXPENSE: &str = "InterestExpense";

    /// Stockholders' equity including noncontrolling interests
    pub const EQUITY_INCL_NCI: &str =
        "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest";

    /// Stockholders' equity, parent only
    pub const EQUITY: &str = "StockholdersEquity";

    /// Total assets
    pub const ASSETS: &str = "Assets";

    /// Debt due within one year
    pub const DEBT_CURRENT: &str = "DebtCurrent";

    /// Long-term debt, noncurrent portion
    pub const DEBT_LONGTERM_NONCURRENT: &str = "LongTermDebtNoncurrent";

    /// Long-term debt, combined presentation
    pub const DEBT_LONGTERM: &str = "LongTermDebt";

    /// Cash and cash equivalents at carrying value
    pub const CASH: &str = "CashAndCashEquivalentsAtCarryingValue";

    /// Operating income (loss), a flow metric
    pub const OPERATING_INCOME: &str = "OperatingIncomeLoss";

    /// Depreciation, depletion and amortization, a flow metric
    pub const DEPRECIATION_AMORTIZATION: &str = "DepreciationDepletionAndAmortization";

    /// Entity-level shares outstanding (DEI taxonomy)
    pub const ENTITY_SHARES_OUTSTANDING: &str = "EntityCommonStockSharesOutstanding";

    /// Balance-sheet shares outstanding (US-GAAP taxonomy)
    pub const COMMON_SHARES_OUTSTANDING: &str = "CommonStockSharesOutstanding";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let json = r#"{
            "cik": 1234,
            "entityName": "Pembina Pipeline Corp",
            "facts": {
                "us-gaap": {
                    "NetIncomeLoss": {
                        "label": "Net Income (Loss)",
                        "units": {
                            "USD": [
                                {"end": "2024-06-30", "val": 1250000000.0,
                                 "form": "10-Q", "frame": "CY2024Q2YTD"}
                            ]
                        }
                    }
                }
            }
        }"#;

        let facts = CompanyFacts::from_json_str(json).unwrap();
        assert_eq!(facts.cik, Some(1234));
        assert_eq!(facts.entity_name.as_deref(), Some("Pembina Pipeline Corp"));

        let items = facts.unit_items("us-gaap", tags::NET_INCOME, "USD").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].val, 1250000000.0);
        assert_eq!(items[0].frame.as_deref(), Some("CY2024Q2YTD"));
        assert!(items[0].filed.is_none());
    }

    #[test]
    fn test_missing_tag_and_unit() {
        let facts = CompanyFacts::from_json_str(r#"{"facts": {}}"#).unwrap();
        assert!(facts.tag("us-gaap", tags::ASSETS).is_none());
        assert!(facts.unit_items("us-gaap", tags::ASSETS, "USD").is_none());
    }

    #[test]
    fn test_invalid_json() {
        assert!(CompanyFacts::from_json_str("{").is_err());
    }
}
