//! Normalized financial snapshot built from a companyfacts document.
//!
//! The parser runs the selector over a fixed set of standardized tags,
//! converts the chosen raw values to millions, derives net debt and an
//! EBITDA proxy, and records the provenance of every selected item.
//!
//! EBITDA is approximated as operating income plus depreciation,
//! depletion and amortization; non-GAAP reported EBITDA is not
//! standardized in XBRL. Maintenance capex is likewise unavailable here
//! and must be sourced from filing text.

use crate::model::{CompanyFacts, FactItem, tags};
use crate::select::{FramePreference, select_latest};
use serde::Serialize;
use tracing::debug;

const MILLIONS: f64 = 1_000_000.0;

/// Filing metadata for one selected fact, kept for auditability parity
/// with the text extractor's citations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactProvenance {
    /// Form type of the filing the value came from
    pub form: Option<String>,
    /// Period end date
    pub end: Option<String>,
    /// Aggregation frame label
    pub frame: Option<String>,
    /// Filed date
    pub filed: Option<String>,
    /// Unit label the value was reported in
    pub unit: String,
    /// Raw value before conversion to millions
    pub raw_value: f64,
}

impl FactProvenance {
    fn new(item: &FactItem, unit: &str, raw_value: f64) -> Self {
        Self {
            form: item.form.clone(),
            end: item.end.clone(),
            frame: item.frame.clone(),
            filed: item.filed.clone(),
            unit: unit.to_string(),
            raw_value,
        }
    }
}

/// Core standardized metrics, in millions (shares in millions of shares).
///
/// Every field is optional: a missing tag yields `None`, and the derived
/// fields propagate missing inputs rather than defaulting them — net debt
/// is `None` when both debt components are missing, and the EBITDA proxy
/// requires both of its inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialSnapshot {
    /// EBITDA proxy: operating income + depreciation and amortization
    pub ebitda: Option<f64>,
    /// Total debt minus cash
    pub net_debt: Option<f64>,
    /// Net income (loss)
    pub net_income: Option<f64>,
    /// Stockholders' equity
    pub shareholder_equity: Option<f64>,
    /// Interest expense
    pub interest_expense: Option<f64>,
    /// Total assets
    pub total_assets: Option<f64>,
    /// Shares outstanding, in millions of shares
    pub shares_outstanding: Option<f64>,
    /// Cash and cash equivalents
    pub cash: Option<f64>,
    /// Current plus long-term debt
    pub total_debt: Option<f64>,
}

/// Provenance of every selected or derived snapshot field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotProvenance {
    /// Net income source item
    pub net_income: Option<FactProvenance>,
    /// Interest expense source item
    pub interest_expense: Option<FactProvenance>,
    /// Equity source item
    pub shareholder_equity: Option<FactProvenance>,
    /// Total assets source item
    pub total_assets: Option<FactProvenance>,
    /// Current-debt component source item
    pub debt_current: Option<FactProvenance>,
    /// Long-term-debt component source item
    pub debt_longterm: Option<FactProvenance>,
    /// Representative item for the derived total debt (long-term
    /// component when present, else current)
    pub total_debt: Option<FactProvenance>,
    /// Cash source item
    pub cash: Option<FactProvenance>,
    /// Operating income source item
    pub operating_income: Option<FactProvenance>,
    /// Depreciation and amortization source item
    pub depreciation_amortization: Option<FactProvenance>,
    /// Representative item for the derived EBITDA proxy
    pub ebitda: Option<FactProvenance>,
    /// Shares outstanding source item
    pub shares_outstanding: Option<FactProvenance>,
}

/// One selected fact: raw value, the item it came from, the unit label.
type Selected<'a> = (f64, &'a FactItem, &'a str);

/// Select the best item for a tag across a unit preference list.
fn select_fact<'a>(
    facts: &'a CompanyFacts,
    taxonomy: &str,
    tag: &str,
    unit_preference: &[&'a str],
    prefer_quarterly: bool,
    preference: FramePreference,
) -> Option<Selected<'a>> {
    for unit in unit_preference {
        let Some(items) = facts.unit_items(taxonomy, tag, unit) else {
            continue;
        };
        if let Some(item) = select_latest(items, prefer_quarterly, preference) {
            return Some((item.val, item, *unit));
        }
    }
    None
}

/// Parse the core standardized metrics out of a companyfacts document.
///
/// `flow_preference` applies to flow metrics only (net income, interest
/// expense, operating income, depreciation); balance-sheet metrics are
/// point-in-time and are selected on period date alone. Returns the
/// snapshot in millions together with per-field provenance.
pub fn parse_snapshot(
    facts: &CompanyFacts,
    flow_preference: FramePreference,
) -> (FinancialSnapshot, SnapshotProvenance) {
    let flow = |tag| select_fact(facts, "us-gaap", tag, &["USD"], true, flow_preference);
    let stock = |tag| select_fact(facts, "us-gaap", tag, &["USD"], false, flow_preference);

    let net_income = flow(tags::NET_INCOME);
    let interest_expense = flow(tags::INTEREST_EXPENSE);
    let equity = stock(tags::EQUITY_INCL_NCI).or_else(|| stock(tags::EQUITY));
    let assets = stock(tags::ASSETS);

    let debt_current = stock(tags::DEBT_CURRENT);
    let debt_longterm =
        stock(tags::DEBT_LONGTERM_NONCURRENT).or_else(|| stock(tags::DEBT_LONGTERM));
    let cash = stock(tags::CASH);

    let operating_income = flow(tags::OPERATING_INCOME);
    let depreciation = flow(tags::DEPRECIATION_AMORTIZATION);

    let shares = select_fact(
        facts,
        "dei",
        tags::ENTITY_SHARES_OUTSTANDING,
        &["shares"],
        true,
        FramePreference::Any,
    )
    .or_else(|| {
        select_fact(
            facts,
            "us-gaap",
            tags::COMMON_SHARES_OUTSTANDING,
            &["shares"],
            true,
            FramePreference::Any,
        )
    });

    // Total debt exists as soon as either component does; net debt only
    // when total debt does. A present cash balance must not turn two
    // missing debt components into a negative net debt.
    let total_debt_raw = match (debt_current.map(|s| s.0), debt_longterm.map(|s| s.0)) {
        (None, None) => None,
        (current, longterm) => Some(current.unwrap_or(0.0) + longterm.unwrap_or(0.0)),
    };
    let cash_raw = cash.map(|s| s.0);
    let net_debt_raw = total_debt_raw.map(|td| td - cash_raw.unwrap_or(0.0));

    let ebitda_raw = match (operating_income.map(|s| s.0), depreciation.map(|s| s.0)) {
        (Some(oi), Some(da)) => Some(oi + da),
        _ => None,
    };

    let to_millions = |raw: Option<f64>| raw.map(|v| v / MILLIONS);

    let snapshot = FinancialSnapshot {
        ebitda: to_millions(ebitda_raw),
        net_debt: to_millions(net_debt_raw),
        net_income: to_millions(net_income.map(|s| s.0)),
        shareholder_equity: to_millions(equity.map(|s| s.0)),
        interest_expense: to_millions(interest_expense.map(|s| s.0)),
        total_assets: to_millions(assets.map(|s| s.0)),
        shares_outstanding: to_millions(shares.map(|s| s.0)),
        cash: to_millions(cash_raw),
        total_debt: to_millions(total_debt_raw),
    };

    fn meta(selected: Option<Selected<'_>>) -> Option<FactProvenance> {
        selected.map(|(raw, item, unit)| FactProvenance::new(item, unit, raw))
    }

    // The derived fields report a representative source item: the
    // long-term component for total debt, the operating-income item for
    // the EBITDA proxy (its unit marked as a composite).
    let total_debt_meta = match (debt_longterm, debt_current, total_debt_raw) {
        (Some((_, item, unit)), _, Some(raw)) | (None, Some((_, item, unit)), Some(raw)) => {
            Some(FactProvenance::new(item, unit, raw))
        }
        _ => None,
    };
    let ebitda_meta = match (operating_income, ebitda_raw) {
        (Some((_, item, _)), Some(raw)) => Some(FactProvenance::new(item, "USD+USD", raw)),
        _ => None,
    };

    let provenance = SnapshotProvenance {
        net_income: meta(net_income),
        interest_expense: meta(interest_expense),
        shareholder_equity: meta(equity),
        total_assets: meta(assets),
        debt_current: meta(debt_current),
        debt_longterm: meta(debt_longterm),
        total_debt: total_debt_meta,
        cash: meta(cash),
        operating_income: meta(operating_income),
        depreciation_amortization: meta(depreciation),
        ebitda: ebitda_meta,
        shares_outstanding: meta(shares),
    };

    debug!(
        entity = facts.entity_name.as_deref().unwrap_or("unknown"),
        preference = %flow_preference,
        ebitda = ?snapshot.ebitda,
        net_debt = ?snapshot.net_debt,
        "parsed companyfacts snapshot"
    );

    (snapshot, provenance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CompanyFacts;

    fn facts(json: &str) -> CompanyFacts {
        CompanyFacts::from_json_str(json).unwrap()
    }

    #[test]
    fn test_net_debt_null_when_both_debt_components_missing() {
        let doc = facts(
            r#"{"facts": {"us-gaap": {
                "CashAndCashEquivalentsAtCarryingValue": {"units": {"USD": [
                    {"end": "2024-06-30", "val": 1050000000, "form": "10-Q"}
                ]}}
            }}}"#,
        );

        let (snapshot, _) = parse_snapshot(&doc, FramePreference::Any);
        assert_eq!(snapshot.cash, Some(1050.0));
        assert!(snapshot.total_debt.is_none());
        assert!(snapshot.net_debt.is_none());
    }

    #[test]
    fn test_single_debt_component_is_enough() {
        let doc = facts(
            r#"{"facts": {"us-gaap": {
                "DebtCurrent": {"units": {"USD": [
                    {"end": "2024-06-30", "val": 2000000000, "form": "10-Q"}
                ]}},
                "CashAndCashEquivalentsAtCarryingValue": {"units": {"USD": [
                    {"end": "2024-06-30", "val": 500000000, "form": "10-Q"}
                ]}}
            }}}"#,
        );

        let (snapshot, provenance) = parse_snapshot(&doc, FramePreference::Any);
        assert_eq!(snapshot.total_debt, Some(2000.0));
        assert_eq!(snapshot.net_debt, Some(1500.0));
        // With no long-term component, the current item is the
        // representative source for the derived total.
        let td = provenance.total_debt.unwrap();
        assert_eq!(td.raw_value, 2_000_000_000.0);
    }

    #[test]
    fn test_ebitda_proxy_requires_both_inputs() {
        let doc = facts(
            r#"{"facts": {"us-gaap": {
                "OperatingIncomeLoss": {"units": {"USD": [
                    {"end": "2024-06-30", "val": 2600000000, "form": "10-Q", "frame": "CY2024Q2QTD"}
                ]}}
            }}}"#,
        );

        let (snapshot, provenance) = parse_snapshot(&doc, FramePreference::Any);
        assert!(snapshot.ebitda.is_none());
        assert!(provenance.ebitda.is_none());
        assert!(provenance.operating_income.is_some());
    }

    #[test]
    fn test_equity_tag_fallback() {
        let doc = facts(
            r#"{"facts": {"us-gaap": {
                "StockholdersEquity": {"units": {"USD": [
                    {"end": "2024-06-30", "val": 16750000000, "form": "10-Q"}
                ]}}
            }}}"#,
        );

        let (snapshot, provenance) = parse_snapshot(&doc, FramePreference::Any);
        assert_eq!(snapshot.shareholder_equity, Some(16750.0));
        assert_eq!(
            provenance.shareholder_equity.unwrap().raw_value,
            16_750_000_000.0
        );
    }

    #[test]
    fn test_shares_prefer_entity_level_tag() {
        let doc = facts(
            r#"{"facts": {
                "us-gaap": {
                    "CommonStockSharesOutstanding": {"units": {"shares": [
                        {"end": "2024-06-30", "val": 100000000, "form": "10-Q"}
                    ]}}
                },
                "dei": {
                    "EntityCommonStockSharesOutstanding": {"units": {"shares": [
                        {"end": "2024-06-30", "val": 572000000, "form": "10-Q"}
                    ]}}
                }
            }}"#,
        );

        let (snapshot, _) = parse_snapshot(&doc, FramePreference::Any);
        assert_eq!(snapshot.shares_outstanding, Some(572.0));
    }
}
