//! Default financial inputs and consistency validation.
//!
//! A valuation config file holds reviewed default metrics for an issuer
//! plus the market and capital-structure assumptions, so CLI runs and
//! tests share one source of truth instead of scattering constants.

use crate::Result;
use crate::inputs::ValuationInputs;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reviewed financial metrics for one issuer, in millions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialData {
    /// EBITDA
    pub ebitda: f64,
    /// Net debt
    pub net_debt: f64,
    /// Maintenance capital expenditure
    pub maintenance_capex: f64,
    /// Net income
    pub net_income: f64,
    /// Stockholders' equity
    pub shareholder_equity: f64,
    /// Interest expense
    pub interest_expense: f64,
    /// Total assets
    pub total_assets: f64,
    /// Shares outstanding, millions
    pub shares_outstanding: f64,
}

/// Market assumptions for the valuation models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAssumptions {
    /// Risk-free rate
    pub risk_free_rate: f64,
    /// Equity risk premium
    pub market_risk_premium: f64,
    /// Company beta
    pub beta: f64,
    /// Pre-tax cost of debt
    pub cost_of_debt: f64,
    /// Effective tax rate
    pub tax_rate: f64,
    /// Reinvestment rate
    pub reinvestment_rate: f64,
    /// Terminal growth rate
    pub terminal_growth: f64,
}

/// Capital-structure weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructure {
    /// Debt share of total capital
    pub debt_weight: f64,
    /// Equity share of total capital
    pub equity_weight: f64,
}

/// A complete default-inputs configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// Issuer financials
    pub financial_data: FinancialData,
    /// Market assumptions
    pub market_assumptions: MarketAssumptions,
    /// Capital structure
    pub capital_structure: CapitalStructure,
}

/// Outcome of a configuration consistency check.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsistencyReport {
    /// No hard issues found
    pub valid: bool,
    /// Hard inconsistencies that make the config unusable
    pub issues: Vec<String>,
    /// Soft findings worth reviewing
    pub warnings: Vec<String>,
}

impl ValuationConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Combine financial data and assumptions into valuation inputs.
    pub fn to_inputs(&self) -> ValuationInputs {
        let financial = &self.financial_data;
        let market = &self.market_assumptions;
        let capital = &self.capital_structure;

        let mut inputs = ValuationInputs::new(
            financial.ebitda,
            financial.net_debt,
            financial.maintenance_capex,
        );
        inputs.tax_rate = market.tax_rate;
        inputs.reinvestment_rate = market.reinvestment_rate;
        inputs.risk_free_rate = market.risk_free_rate;
        inputs.market_risk_premium = market.market_risk_premium;
        inputs.beta = market.beta;
        inputs.cost_of_debt = market.cost_of_debt;
        inputs.debt_weight = capital.debt_weight;
        inputs.equity_weight = capital.equity_weight;
        inputs.terminal_growth = market.terminal_growth;
        inputs.net_income = Some(financial.net_income);
        inputs.shares_outstanding = Some(financial.shares_outstanding);
        inputs
    }

    /// Check the configuration for internal consistency.
    ///
    /// Weights that do not sum to one are a hard issue; leverage, coverage
    /// and capex findings are warnings only.
    pub fn validate(&self) -> ConsistencyReport {
        let mut report = ConsistencyReport::default();
        let financial = &self.financial_data;
        let capital = &self.capital_structure;

        let total_weight = capital.debt_weight + capital.equity_weight;
        if (total_weight - 1.0).abs() > 0.01 {
            report.issues.push(format!(
                "capital structure weights don't sum to 1.0: {total_weight}"
            ));
        }

        let total_capital = financial.net_debt + financial.shareholder_equity;
        if total_capital > 0.0 {
            let implied_debt_weight = financial.net_debt / total_capital;
            if (implied_debt_weight - capital.debt_weight).abs() > 0.01 {
                report.warnings.push(format!(
                    "debt weight mismatch: implied {:.2}, configured {:.2}",
                    implied_debt_weight, capital.debt_weight
                ));
            }
        }

        if financial.interest_expense > 0.0 {
            let coverage = financial.ebitda / financial.interest_expense;
            if coverage < 3.0 {
                report
                    .warnings
                    .push(format!("low interest coverage: {coverage:.1}x (< 3x)"));
            }
        }

        if financial.ebitda > 0.0 {
            let capex_ratio = financial.maintenance_capex / financial.ebitda;
            if capex_ratio > 0.15 {
                report.warnings.push(format!(
                    "high maintenance capex ratio: {:.1}% (> 15%)",
                    capex_ratio * 100.0
                ));
            }
        }

        report.valid = report.issues.is_empty();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ValuationConfig {
        ValuationConfig {
            financial_data: FinancialData {
                ebitda: 3450.0,
                net_debt: 18750.0,
                maintenance_capex: 220.0,
                net_income: 1250.0,
                shareholder_equity: 16750.0,
                interest_expense: 380.0,
                total_assets: 36550.0,
                shares_outstanding: 572.0,
            },
            market_assumptions: MarketAssumptions {
                risk_free_rate: 0.04,
                market_risk_premium: 0.06,
                beta: 0.8,
                cost_of_debt: 0.05,
                tax_rate: 0.25,
                reinvestment_rate: 0.15,
                terminal_growth: 0.02,
            },
            capital_structure: CapitalStructure {
                debt_weight: 0.53,
                equity_weight: 0.47,
            },
        }
    }

    #[test]
    fn test_to_inputs() {
        let inputs = sample_config().to_inputs();
        assert_eq!(inputs.ebitda, 3450.0);
        assert_eq!(inputs.beta, 0.8);
        assert_eq!(inputs.net_income, Some(1250.0));
        assert_eq!(inputs.shares_outstanding, Some(572.0));
    }

    #[test]
    fn test_consistent_config_passes() {
        let report = sample_config().validate();
        assert!(report.valid, "unexpected issues: {:?}", report.issues);
    }

    #[test]
    fn test_bad_weights_are_an_issue() {
        let mut config = sample_config();
        config.capital_structure.debt_weight = 0.7;
        let report = config.validate();
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn test_low_coverage_is_a_warning() {
        let mut config = sample_config();
        config.financial_data.interest_expense = 2000.0;
        let report = config.validate();
        assert!(report.valid);
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.contains("interest coverage"))
        );
    }

    #[test]
    fn test_roundtrip_json() {
        let config = sample_config();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = ValuationConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
