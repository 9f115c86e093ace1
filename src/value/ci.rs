//! Commercial & industrial value of energizing a project earlier.

use crate::error::ValidationError;

/// Project sizes evaluated for every request (MW).
pub const PROJECT_LOADS_MW: [u32; 3] = [10, 20, 30];

const DOLLARS_PER_MILLION: f64 = 1_000_000.0;

/// Longest operating horizon accepted (years).
pub const MAX_OP_HORIZON_YEARS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CiInputs {
    /// Annual EBITDA per MW of load ($M).
    pub ebitda_per_mw_musd: f64,
    /// Years the project starts earlier thanks to the VPP. May be fractional.
    pub time_savings_years: f64,
    /// Discount rate as a fraction (0.10 = 10%).
    pub discount_rate: f64,
    /// Operating horizon in years.
    pub op_horizon_years: u32,
}

impl CiInputs {
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !self.ebitda_per_mw_musd.is_finite() {
            errors.push(ValidationError::new("ebitdaPerMW", "must be finite"));
        }
        if !(self.discount_rate.is_finite() && self.discount_rate > -1.0) {
            errors.push(ValidationError::new("discountRate", "must be > -100%"));
        }
        let horizon_ok = (1..=MAX_OP_HORIZON_YEARS).contains(&self.op_horizon_years);
        if !horizon_ok {
            errors.push(ValidationError::new(
                "opHorizon",
                format!(
                    "must be in [1, {MAX_OP_HORIZON_YEARS}], got {}",
                    self.op_horizon_years
                ),
            ));
        }
        // the delay may not exceed the horizon it shifts
        let max_delay = if horizon_ok {
            f64::from(self.op_horizon_years)
        } else {
            f64::from(MAX_OP_HORIZON_YEARS)
        };
        if !(0.0..=max_delay).contains(&self.time_savings_years) {
            errors.push(ValidationError::new(
                "timeSavings",
                format!(
                    "must be in [0, {max_delay}], got {}",
                    self.time_savings_years
                ),
            ));
        }
        errors
    }
}

/// Annualized NPV advantage for one project size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CiCase {
    pub load_mw: u32,
    /// NPV advantage divided by the horizon ($).
    pub annualized_npv: f64,
}

/// NPV of a constant annual cash flow received in years `1 + delay ..= horizon + delay`.
fn npv(annual: f64, rate: f64, horizon: u32, delay: f64) -> f64 {
    (1..=horizon)
        .map(|year| annual / (1.0 + rate).powf(f64::from(year) + delay))
        .sum()
}

/// Compares immediate deployment with a start delayed by `time_savings_years`.
pub fn ci_value(inputs: &CiInputs) -> Vec<CiCase> {
    let ebitda_per_mw = inputs.ebitda_per_mw_musd * DOLLARS_PER_MILLION;

    PROJECT_LOADS_MW
        .iter()
        .map(|&load_mw| {
            let total_ebitda = f64::from(load_mw) * ebitda_per_mw;
            let npv_with_vpp = npv(
                total_ebitda,
                inputs.discount_rate,
                inputs.op_horizon_years,
                0.0,
            );
            let npv_without_vpp = npv(
                total_ebitda,
                inputs.discount_rate,
                inputs.op_horizon_years,
                inputs.time_savings_years,
            );
            CiCase {
                load_mw,
                annualized_npv: (npv_with_vpp - npv_without_vpp)
                    / f64::from(inputs.op_horizon_years),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn inputs() -> CiInputs {
        CiInputs {
            ebitda_per_mw_musd: 1.0,
            time_savings_years: 2.0,
            discount_rate: 0.10,
            op_horizon_years: 10,
        }
    }

    #[test]
    fn evaluates_three_project_sizes() {
        let cases = ci_value(&inputs());
        let loads: Vec<u32> = cases.iter().map(|c| c.load_mw).collect();
        assert_eq!(loads, vec![10, 20, 30]);
    }

    #[test]
    fn advantage_matches_closed_form() {
        // annuity factor for 10 years at 10% is 6.144567; delaying 2 years
        // scales it by 1 / 1.1^2
        let annuity = (1.0 - 1.1_f64.powi(-10)) / 0.1;
        let expected = 10e6 * annuity * (1.0 - 1.1_f64.powi(-2)) / 10.0;
        let cases = ci_value(&inputs());
        assert_relative_eq!(cases[0].annualized_npv, expected, max_relative = 1e-12);
        assert_relative_eq!(cases[0].annualized_npv / 1e6, 1.066412, max_relative = 1e-6);
    }

    #[test]
    fn advantage_scales_with_load() {
        let cases = ci_value(&inputs());
        assert_relative_eq!(
            cases[2].annualized_npv,
            3.0 * cases[0].annualized_npv,
            max_relative = 1e-12
        );
    }

    #[test]
    fn no_time_savings_no_advantage() {
        let cases = ci_value(&CiInputs {
            time_savings_years: 0.0,
            ..inputs()
        });
        assert!(cases.iter().all(|c| c.annualized_npv == 0.0));
    }

    #[test]
    fn fractional_delay_lands_between_whole_years() {
        let at = |years: f64| {
            let cases = ci_value(&CiInputs {
                time_savings_years: years,
                ..inputs()
            });
            cases[0].annualized_npv
        };
        let half = at(1.5);
        assert!(at(1.0) < half && half < at(2.0));
        let expected_factor = 1.0 - 1.1_f64.powf(-1.5);
        assert_relative_eq!(
            half / at(2.0),
            expected_factor / (1.0 - 1.1_f64.powi(-2)),
            max_relative = 1e-12
        );
    }

    #[test]
    fn oversized_horizon_and_delay_are_rejected() {
        let long = CiInputs {
            op_horizon_years: MAX_OP_HORIZON_YEARS + 1,
            ..inputs()
        };
        assert!(long.violations().iter().any(|e| e.field == "opHorizon"));

        let huge_delay = CiInputs {
            time_savings_years: f64::from(u32::MAX),
            ..inputs()
        };
        let fields: Vec<String> = huge_delay.violations().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["timeSavings"]);

        for bad in [-1.0, 10.5, f64::NAN, f64::INFINITY] {
            let delayed = CiInputs {
                time_savings_years: bad,
                ..inputs()
            };
            assert!(!delayed.violations().is_empty(), "{bad} accepted");
        }
        assert!(inputs().violations().is_empty());
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let bad = CiInputs {
            op_horizon_years: 0,
            ..inputs()
        };
        assert!(bad.violations().iter().any(|e| e.field == "opHorizon"));
    }
}
