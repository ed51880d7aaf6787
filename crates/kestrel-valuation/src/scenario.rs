//! Scenario adjustments for sensitivity analysis.

use crate::inputs::ValuationInputs;
use serde::{Deserialize, Serialize};

/// Stress-test adjustments applied on top of base valuation inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationScenario {
    /// Interest-rate shift in basis points (+200 = +2%), applied to both
    /// the risk-free rate and the cost of debt
    #[serde(default)]
    pub rate_bps_change: i32,

    /// Operational throughput change in percent (-5.0 = -5%), applied to
    /// EBITDA
    #[serde(default)]
    pub throughput_pct_change: f64,

    /// Direct EBITDA uplift or drag as a decimal (0.02 = +2%)
    #[serde(default)]
    pub ebitda_uplift: f64,
}

impl ValuationScenario {
    /// Apply the scenario to a set of inputs, returning the adjusted copy.
    /// The base inputs are left untouched.
    pub fn apply(&self, inputs: &ValuationInputs) -> ValuationInputs {
        let mut adjusted = inputs.clone();

        let rate_change = f64::from(self.rate_bps_change) / 10_000.0;
        adjusted.risk_free_rate += rate_change;
        adjusted.cost_of_debt += rate_change;

        adjusted.ebitda *= 1.0 + self.throughput_pct_change / 100.0;
        adjusted.ebitda *= 1.0 + self.ebitda_uplift;

        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rate_shift() {
        let inputs = ValuationInputs::new(1000.0, 4000.0, 100.0);
        let scenario = ValuationScenario {
            rate_bps_change: 200,
            ..Default::default()
        };

        let adjusted = scenario.apply(&inputs);
        assert_relative_eq!(adjusted.risk_free_rate, inputs.risk_free_rate + 0.02);
        assert_relative_eq!(adjusted.cost_of_debt, inputs.cost_of_debt + 0.02);
        assert_eq!(adjusted.ebitda, inputs.ebitda);
    }

    #[test]
    fn test_throughput_and_uplift_compound() {
        let inputs = ValuationInputs::new(1000.0, 4000.0, 100.0);
        let scenario = ValuationScenario {
            rate_bps_change: 0,
            throughput_pct_change: -5.0,
            ebitda_uplift: 0.02,
        };

        let adjusted = scenario.apply(&inputs);
        assert_relative_eq!(adjusted.ebitda, 1000.0 * 0.95 * 1.02);
    }

    #[test]
    fn test_base_inputs_untouched() {
        let inputs = ValuationInputs::new(1000.0, 4000.0, 100.0);
        let scenario = ValuationScenario {
            rate_bps_change: -100,
            throughput_pct_change: 10.0,
            ebitda_uplift: 0.0,
        };

        let _ = scenario.apply(&inputs);
        assert_eq!(inputs.ebitda, 1000.0);
        assert_eq!(inputs.risk_free_rate, 0.04);
    }
}
