//! Simple payback of a financed battery system.

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaybackInputs {
    /// Installed cost before incentives ($).
    pub total_cost: f64,
    /// Federal investment tax credit as a fraction of `total_cost`.
    pub federal_itc: f64,
    pub state_rebates: f64,
    pub utility_rebate: f64,
    /// Homeowner bill reduction per year ($).
    pub annual_savings: f64,
}

impl PaybackInputs {
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let non_negative = [
            ("totalCost", self.total_cost),
            ("stateRebates", self.state_rebates),
            ("utilityRebate", self.utility_rebate),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ValidationError::new(field, "must be a finite number >= 0"));
            }
        }
        if !(0.0..=1.0).contains(&self.federal_itc) {
            errors.push(ValidationError::new("federalITC", "must be in [0, 100]%"));
        }
        if !self.annual_savings.is_finite() {
            errors.push(ValidationError::new("annualSavings", "must be finite"));
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaybackResult {
    pub net_cost: f64,
    pub federal_credit: f64,
    pub annual_savings: f64,
    /// Years to recover `net_cost`; `0.0` when there are no savings to
    /// recover it with.
    pub payback_years: f64,
}

pub fn payback(inputs: &PaybackInputs) -> PaybackResult {
    let federal_credit = inputs.total_cost * inputs.federal_itc;
    let net_cost =
        inputs.total_cost - federal_credit - inputs.state_rebates - inputs.utility_rebate;

    let payback_years = if inputs.annual_savings > 0.0 {
        net_cost / inputs.annual_savings
    } else {
        0.0
    };

    PaybackResult {
        net_cost,
        federal_credit,
        annual_savings: inputs.annual_savings,
        payback_years,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn inputs(annual_savings: f64) -> PaybackInputs {
        PaybackInputs {
            total_cost: 3500.0,
            federal_itc: 0.30,
            state_rebates: 0.0,
            utility_rebate: 500.0,
            annual_savings,
        }
    }

    #[test]
    fn incentives_reduce_net_cost() {
        let result = payback(&inputs(200.0));
        assert_abs_diff_eq!(result.federal_credit, 1050.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.net_cost, 1950.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.payback_years, 9.75, epsilon = 1e-9);
    }

    #[test]
    fn no_savings_means_zero_payback() {
        assert_eq!(payback(&inputs(0.0)).payback_years, 0.0);
        assert_eq!(payback(&inputs(-10.0)).payback_years, 0.0);
    }

    #[test]
    fn blended_savings_feed_payback() {
        let result = payback(&inputs(279.8));
        assert_abs_diff_eq!(result.payback_years, 1950.0 / 279.8, epsilon = 1e-12);
    }

    #[test]
    fn rebates_can_exceed_cost() {
        let result = payback(&PaybackInputs {
            state_rebates: 3000.0,
            ..inputs(100.0)
        });
        assert!(result.net_cost < 0.0);
        assert!(result.payback_years < 0.0);
    }

    #[test]
    fn negative_cost_is_rejected() {
        let bad = PaybackInputs {
            total_cost: -1.0,
            federal_itc: 1.5,
            ..inputs(100.0)
        };
        let fields: Vec<String> = bad.violations().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["totalCost", "federalITC"]);
    }
}
