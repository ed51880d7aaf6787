//! Core valuation models: WACC, EPV, DCF and the derived-ratio block.

use crate::inputs::ValuationInputs;
use crate::scenario::ValuationScenario;
use serde::Serialize;

/// Weighted average cost of capital.
///
/// `WACC = E/V · Re + D/V · Rd · (1 − Tc)` with the cost of equity from
/// CAPM: `Re = rf + β · MRP`.
pub fn wacc(inputs: &ValuationInputs) -> f64 {
    let cost_of_equity = inputs.risk_free_rate + inputs.beta * inputs.market_risk_premium;
    let cost_of_debt_after_tax = inputs.cost_of_debt * (1.0 - inputs.tax_rate);

    inputs.equity_weight * cost_of_equity + inputs.debt_weight * cost_of_debt_after_tax
}

/// Enterprise present value from normalized free cash flow.
///
/// Normalized EBIT is EBITDA less maintenance capex; NOPAT applies the
/// tax rate; free cash flow applies the reinvestment rate; the perpetuity
/// discounts at WACC. A non-positive WACC yields +∞ rather than dividing
/// by zero.
pub fn epv(inputs: &ValuationInputs) -> f64 {
    let normalized_ebit = inputs.ebitda - inputs.maintenance_capex;
    let nopat = normalized_ebit * (1.0 - inputs.tax_rate);
    let free_cash_flow = nopat * (1.0 - inputs.reinvestment_rate);

    let wacc = wacc(inputs);
    if wacc <= 0.0 {
        return f64::INFINITY;
    }

    free_cash_flow / wacc
}

/// Detailed components of a DCF calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DcfComponents {
    /// Present value of each projected year's FCFF
    pub projected_fcffs: Vec<f64>,
    /// Present value of the Gordon terminal value
    pub terminal_value: f64,
    /// Discount rate used
    pub wacc: f64,
}

/// Result of a DCF calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcfOutcome {
    /// Enterprise value: discounted projections plus terminal value
    pub dcf_value: f64,
    /// Calculation components for auditability
    pub components: DcfComponents,
}

/// Discounted cash flow value over the explicit projection period plus a
/// Gordon terminal value.
///
/// FCFF is simplified to after-tax normalized EBIT plus the debt tax
/// shield, grown at the terminal rate through the projection period.
pub fn dcf(inputs: &ValuationInputs) -> DcfOutcome {
    let wacc = wacc(inputs);
    if wacc <= 0.0 {
        return DcfOutcome {
            dcf_value: f64::INFINITY,
            components: DcfComponents::default(),
        };
    }

    let normalized_ebit = inputs.ebitda - inputs.maintenance_capex;
    let tax_shield = inputs.net_debt * inputs.cost_of_debt * inputs.tax_rate;
    let fcff = normalized_ebit * (1.0 - inputs.tax_rate) + tax_shield;

    let mut projected_fcffs = Vec::with_capacity(inputs.projection_years as usize);
    for year in 1..=inputs.projection_years {
        let projected = fcff * (1.0 + inputs.terminal_growth).powi(year as i32);
        let present = projected / (1.0 + wacc).powi(year as i32);
        projected_fcffs.push(present);
    }

    let terminal_value = fcff * (1.0 + inputs.terminal_growth) / (wacc - inputs.terminal_growth);
    let pv_terminal = terminal_value / (1.0 + wacc).powi(inputs.projection_years as i32);

    let dcf_value = projected_fcffs.iter().sum::<f64>() + pv_terminal;

    DcfOutcome {
        dcf_value,
        components: DcfComponents {
            projected_fcffs,
            terminal_value: pv_terminal,
            wacc,
        },
    }
}

/// Complete valuation output: core models, ratios and optional scenario
/// results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationResults {
    /// Enterprise present value, in millions
    pub epv: f64,
    /// DCF enterprise value, in millions
    pub dcf_value: f64,
    /// Weighted average cost of capital
    pub wacc: f64,
    /// CAPM cost of equity
    pub cost_of_equity: f64,
    /// After-tax cost of debt
    pub cost_of_debt_after_tax: f64,

    /// EV / EBITDA multiple
    pub ev_ebitda_ratio: f64,
    /// Net debt / EBITDA leverage ratio
    pub net_debt_ebitda_ratio: f64,

    /// Return on invested capital
    pub roic: Option<f64>,
    /// Return on equity
    pub roe: Option<f64>,
    /// Dividend payout ratio
    pub payout_ratio: Option<f64>,
    /// Annual dividend yield
    pub dividend_yield: Option<f64>,
    /// Net debt over market equity
    pub debt_to_equity: Option<f64>,
    /// EBITDA over approximated interest expense
    pub interest_coverage: Option<f64>,

    /// EPV under the requested scenario
    pub scenario_epv: Option<f64>,
    /// DCF value under the requested scenario
    pub scenario_dcf: Option<f64>,

    /// DCF calculation components
    pub dcf_components: DcfComponents,
}

/// Run the full valuation, optionally under a scenario.
pub fn valuation(
    inputs: &ValuationInputs,
    scenario: Option<&ValuationScenario>,
) -> ValuationResults {
    let wacc_value = wacc(inputs);
    let epv_value = epv(inputs);
    let dcf_outcome = dcf(inputs);

    let cost_of_equity = inputs.risk_free_rate + inputs.beta * inputs.market_risk_premium;
    let cost_of_debt_after_tax = inputs.cost_of_debt * (1.0 - inputs.tax_rate);

    let ev_ebitda_ratio = if inputs.ebitda != 0.0 {
        epv_value / inputs.ebitda
    } else {
        0.0
    };
    let net_debt_ebitda_ratio = if inputs.ebitda != 0.0 {
        inputs.net_debt / inputs.ebitda
    } else {
        0.0
    };

    // Extended ratios unlock only when their inputs are present and the
    // denominators are meaningful.
    let roic = inputs.net_income.and_then(|_| {
        if inputs.ebitda == 0.0 {
            return None;
        }
        let nopat = inputs.ebitda * (1.0 - inputs.tax_rate);
        // Invested capital proxied by enterprise value.
        (epv_value != 0.0 && epv_value.is_finite()).then(|| nopat / epv_value)
    });

    let roe = inputs.net_income.and_then(|net_income| {
        let equity = epv_value - inputs.net_debt;
        (equity != 0.0 && equity.is_finite()).then(|| net_income / equity)
    });

    let payout_ratio = match (
        inputs.dividend_per_share,
        inputs.net_income,
        inputs.shares_outstanding,
    ) {
        (Some(dps), Some(net_income), Some(shares)) if net_income != 0.0 => {
            Some(dps * shares / net_income)
        }
        _ => None,
    };

    let dividend_yield = match (inputs.dividend_per_share, inputs.share_price) {
        (Some(dps), Some(price)) if price != 0.0 => Some(dps / price),
        _ => None,
    };

    let debt_to_equity = match (inputs.shares_outstanding, inputs.share_price) {
        (Some(shares), Some(price)) if shares * price != 0.0 => {
            Some(inputs.net_debt / (shares * price))
        }
        _ => None,
    };

    let interest_coverage = {
        // Interest expense approximated as cost of debt on net debt.
        let interest = inputs.cost_of_debt * inputs.net_debt;
        (interest != 0.0).then(|| inputs.ebitda / interest)
    };

    let (scenario_epv, scenario_dcf) = match scenario {
        Some(scenario) => {
            let adjusted = scenario.apply(inputs);
            (Some(epv(&adjusted)), Some(dcf(&adjusted).dcf_value))
        }
        None => (None, None),
    };

    ValuationResults {
        epv: epv_value,
        dcf_value: dcf_outcome.dcf_value,
        wacc: wacc_value,
        cost_of_equity,
        cost_of_debt_after_tax,
        ev_ebitda_ratio,
        net_debt_ebitda_ratio,
        roic,
        roe,
        payout_ratio,
        dividend_yield,
        debt_to_equity,
        interest_coverage,
        scenario_epv,
        scenario_dcf,
        dcf_components: dcf_outcome.components,
    }
}
