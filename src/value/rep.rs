//! Retail electricity provider economics for a fleet of battery homes.

use tracing::debug;

use crate::error::ValidationError;
use crate::sim::yearly::{DAYS_PER_YEAR, YearlyBlend};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Per-home annual figures taken from the homeowner side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeownerAnnual {
    /// Homeowner bill reduction per year ($).
    pub blended_annual_savings: f64,
    /// Energy shifted through the battery per year (kWh).
    pub total_energy_shifted: f64,
}

impl From<&YearlyBlend> for HomeownerAnnual {
    fn from(blend: &YearlyBlend) -> Self {
        Self {
            blended_annual_savings: blend.blended_annual_savings,
            total_energy_shifted: blend.total_energy_shifted,
        }
    }
}

/// Provider-side parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepInputs {
    /// Number of homes in the fleet.
    pub homes: u32,
    /// Wholesale price during peak hours ($/kWh).
    pub wholesale_peak_per_kwh: f64,
    /// Wholesale price during off-peak hours ($/kWh).
    pub wholesale_off_peak_per_kwh: f64,
    /// Ancillary service payment ($/kW-month).
    pub ancillary_value: f64,
    /// Dispatchable capacity each home contributes (kW).
    pub capacity_contribution_kw: f64,
}

impl RepInputs {
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let non_negative = [
            ("wholesalePeak", self.wholesale_peak_per_kwh),
            ("wholesaleOffPeak", self.wholesale_off_peak_per_kwh),
            ("ancillaryValue", self.ancillary_value),
            ("capacityContribution", self.capacity_contribution_kw),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ValidationError::new(field, "must be a finite number >= 0"));
            }
        }
        errors
    }
}

/// Provider value breakdown ($ per year unless noted).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepValue {
    /// Energy shifted per home per day (kWh).
    pub avg_daily_energy_shifted: f64,
    /// Energy shifted across the fleet per day (kWh).
    pub avg_daily_fleet_shifted: f64,
    /// Energy shifted across the fleet per year (kWh).
    pub fleet_annual_shift_kwh: f64,
    pub wholesale_cost_savings: f64,
    pub retail_revenue_loss: f64,
    /// `wholesale_cost_savings - retail_revenue_loss`; negative when the
    /// retail spread exceeds the wholesale spread.
    pub net_margin_improvement: f64,
    pub ancillary_revenue: f64,
    pub total_value: f64,
}

/// Computes provider value without double counting the homeowner's savings.
///
/// Every dollar the homeowner saves is a dollar of retail revenue the
/// provider does not collect, so the loss is taken directly from
/// `homeowner.blended_annual_savings` and never recomputed from rates.
/// Shifted energy is modeled as moving from peak to off-peak wholesale
/// procurement. Ancillary revenue is an independent additive stream.
pub fn rep_value(inputs: &RepInputs, homeowner: HomeownerAnnual) -> RepValue {
    let homes = f64::from(inputs.homes);

    let avg_daily_energy_shifted = if homeowner.total_energy_shifted > 0.0 {
        homeowner.total_energy_shifted / f64::from(DAYS_PER_YEAR)
    } else {
        0.0
    };
    let avg_daily_fleet_shifted = avg_daily_energy_shifted * homes;
    let fleet_annual_shift_kwh = homeowner.total_energy_shifted * homes;

    let retail_revenue_loss = homeowner.blended_annual_savings * homes;

    let wholesale_cost_without_battery = fleet_annual_shift_kwh * inputs.wholesale_peak_per_kwh;
    let wholesale_cost_with_battery = fleet_annual_shift_kwh * inputs.wholesale_off_peak_per_kwh;
    let wholesale_cost_savings = wholesale_cost_without_battery - wholesale_cost_with_battery;

    let net_margin_improvement = wholesale_cost_savings - retail_revenue_loss;
    let ancillary_revenue =
        homes * inputs.capacity_contribution_kw * inputs.ancillary_value * MONTHS_PER_YEAR;
    let total_value = net_margin_improvement + ancillary_revenue;

    debug!(
        homes = inputs.homes,
        wholesale_cost_savings, retail_revenue_loss, ancillary_revenue, "computed rep value"
    );

    RepValue {
        avg_daily_energy_shifted,
        avg_daily_fleet_shifted,
        fleet_annual_shift_kwh,
        wholesale_cost_savings,
        retail_revenue_loss,
        net_margin_improvement,
        ancillary_revenue,
        total_value,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn inputs() -> RepInputs {
        RepInputs {
            homes: 10_000,
            wholesale_peak_per_kwh: 0.25,
            wholesale_off_peak_per_kwh: 0.03,
            ancillary_value: 2.5,
            capacity_contribution_kw: 4.0,
        }
    }

    fn homeowner() -> HomeownerAnnual {
        HomeownerAnnual {
            blended_annual_savings: 279.8,
            total_energy_shifted: 2022.05,
        }
    }

    #[test]
    fn revenue_loss_is_homeowner_savings() {
        let value = rep_value(&inputs(), homeowner());
        assert_abs_diff_eq!(value.retail_revenue_loss, 2_798_000.0, epsilon = 1e-6);
    }

    #[test]
    fn wholesale_savings_use_price_spread() {
        let value = rep_value(&inputs(), homeowner());
        assert_abs_diff_eq!(
            value.wholesale_cost_savings,
            2022.05 * 10_000.0 * 0.22,
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(
            value.net_margin_improvement,
            value.wholesale_cost_savings - value.retail_revenue_loss,
            epsilon = 1e-9
        );
    }

    #[test]
    fn ancillary_revenue_is_independent() {
        let value = rep_value(&inputs(), homeowner());
        assert_abs_diff_eq!(value.ancillary_revenue, 1_200_000.0, epsilon = 1e-6);
        let idle = rep_value(
            &inputs(),
            HomeownerAnnual {
                blended_annual_savings: 0.0,
                total_energy_shifted: 0.0,
            },
        );
        assert_eq!(idle.ancillary_revenue, value.ancillary_revenue);
        assert_eq!(idle.total_value, idle.ancillary_revenue);
    }

    #[test]
    fn no_wholesale_spread_means_negative_margin() {
        let flat = RepInputs {
            wholesale_off_peak_per_kwh: 0.25,
            ..inputs()
        };
        let value = rep_value(&flat, homeowner());
        assert_eq!(value.wholesale_cost_savings, 0.0);
        assert!(value.net_margin_improvement < 0.0);
    }

    #[test]
    fn daily_shift_averages() {
        let value = rep_value(&inputs(), homeowner());
        assert_abs_diff_eq!(value.avg_daily_energy_shifted, 2022.05 / 365.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            value.avg_daily_fleet_shifted,
            2022.05 / 365.0 * 10_000.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn negative_prices_are_rejected() {
        let bad = RepInputs {
            wholesale_peak_per_kwh: -1.0,
            ..inputs()
        };
        assert!(bad.violations().iter().any(|e| e.field == "wholesalePeak"));
    }
}
