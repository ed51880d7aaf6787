//! Valuation input parameters.

use serde::{Deserialize, Serialize};

fn default_tax_rate() -> f64 {
    0.25
}
fn default_reinvestment_rate() -> f64 {
    0.15
}
fn default_risk_free_rate() -> f64 {
    0.04
}
fn default_market_risk_premium() -> f64 {
    0.06
}
fn default_beta() -> f64 {
    0.8
}
fn default_cost_of_debt() -> f64 {
    0.05
}
fn default_debt_weight() -> f64 {
    0.4
}
fn default_equity_weight() -> f64 {
    0.6
}
fn default_terminal_growth() -> f64 {
    0.02
}
fn default_projection_years() -> u32 {
    5
}

/// Everything the valuation models need: core metrics, capital-structure
/// and market assumptions, and optional equity metrics that unlock the
/// extended ratio block.
///
/// Monetary values are in millions; rates are decimals (0.04 = 4%). The
/// assumption defaults reflect a mature energy-infrastructure issuer:
/// beta 0.8, 40/60 debt/equity split, 2% terminal growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInputs {
    /// Earnings before interest, taxes, depreciation and amortization
    pub ebitda: f64,

    /// Total interest-bearing debt minus cash and equivalents
    pub net_debt: f64,

    /// Capital expenditure required to maintain current operations
    pub maintenance_capex: f64,

    /// Effective corporate tax rate
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    /// Share of NOPAT reinvested in the business
    #[serde(default = "default_reinvestment_rate")]
    pub reinvestment_rate: f64,

    /// Shares outstanding, in millions
    #[serde(default)]
    pub shares_outstanding: Option<f64>,

    /// Annual dividend per share
    #[serde(default)]
    pub dividend_per_share: Option<f64>,

    /// Current market price per share
    #[serde(default)]
    pub share_price: Option<f64>,

    /// Net income, in millions
    #[serde(default)]
    pub net_income: Option<f64>,

    /// Risk-free rate, typically the 10-year Treasury yield
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Equity risk premium
    #[serde(default = "default_market_risk_premium")]
    pub market_risk_premium: f64,

    /// Company beta against the market
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Pre-tax cost of debt
    #[serde(default = "default_cost_of_debt")]
    pub cost_of_debt: f64,

    /// Debt share of the capital structure
    #[serde(default = "default_debt_weight")]
    pub debt_weight: f64,

    /// Equity share of the capital structure
    #[serde(default = "default_equity_weight")]
    pub equity_weight: f64,

    /// Long-term growth rate for the DCF terminal value
    #[serde(default = "default_terminal_growth")]
    pub terminal_growth: f64,

    /// Explicit projection period for the DCF
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,
}

impl ValuationInputs {
    /// Inputs with the three required metrics and default assumptions.
    pub fn new(ebitda: f64, net_debt: f64, maintenance_capex: f64) -> Self {
        Self {
            ebitda,
            net_debt,
            maintenance_capex,
            tax_rate: default_tax_rate(),
            reinvestment_rate: default_reinvestment_rate(),
            shares_outstanding: None,
            dividend_per_share: None,
            share_price: None,
            net_income: None,
            risk_free_rate: default_risk_free_rate(),
            market_risk_premium: default_market_risk_premium(),
            beta: default_beta(),
            cost_of_debt: default_cost_of_debt(),
            debt_weight: default_debt_weight(),
            equity_weight: default_equity_weight(),
            terminal_growth: default_terminal_growth(),
            projection_years: default_projection_years(),
        }
    }
}
