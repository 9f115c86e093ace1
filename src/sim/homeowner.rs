//! One synthetic day of HVAC cost with and without the battery.

use tracing::debug;

use crate::devices::{BatteryConfig, HvacLoad};
use crate::profile::HourlyProfile;
use crate::sim::dispatch::{DispatchPlan, optimize};
use crate::tariff::{PricingConfig, build_rates};

/// Costs split by the tariff's peak window ($).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub peak_cost_no_battery: f64,
    pub off_peak_cost_no_battery: f64,
    pub charge_cost_with_battery: f64,
    pub peak_cost_with_battery: f64,
    pub off_peak_cost_with_battery: f64,
}

/// Complete, unrounded record of one homeowner day.
///
/// Rounding is applied only when the day is turned into a
/// [`crate::report::DayReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct DayResult {
    /// HVAC consumption per hour (kWh).
    pub hvac_usage: HourlyProfile,
    /// Price per hour ($/kWh).
    pub rates: HourlyProfile,
    /// HVAC consumption served by the grid after battery discharge (kWh).
    pub hvac_from_grid: HourlyProfile,
    pub dispatch: DispatchPlan,
    /// Total HVAC consumption (kWh).
    pub total_hvac_usage: f64,
    pub cost_without_battery: f64,
    pub cost_with_battery: f64,
    /// `cost_without_battery - cost_with_battery`; negative when the
    /// battery schedule costs more than doing nothing.
    pub daily_savings: f64,
    pub breakdown: CostBreakdown,
}

impl DayResult {
    /// Energy moved through the battery (kWh).
    pub fn energy_shifted(&self) -> f64 {
        self.dispatch.energy_stored
    }

    pub fn capacity_shortfall(&self) -> bool {
        self.dispatch.has_shortfall()
    }
}

/// Simulates one day for the given load, pricing, and battery.
///
/// Peak and off-peak costs are split on the tariff window even under
/// real-time pricing, so breakdowns stay comparable across pricing models.
///
/// Expects validated inputs, as produced by `HomeownerParams::resolve` or the
/// `new` constructors. A shape outside `[1, 10]` gives a zero or negative
/// spread; debug builds assert against it.
pub fn simulate_day(
    hvac: &HvacLoad,
    pricing: &PricingConfig,
    battery: &BatteryConfig,
) -> DayResult {
    debug_assert!(
        hvac.violations().is_empty(),
        "simulate_day called with an invalid hvac load: {hvac:?}"
    );
    let hvac_usage = hvac.profile();
    let rates = build_rates(pricing);
    let window = pricing.window();

    let total_hvac_usage = hvac_usage.total();
    let cost_without_battery = hvac_usage.dot(&rates);
    let peak_cost_no_battery = hvac_usage.dot_where(&rates, |h| window.is_peak(h));
    let off_peak_cost_no_battery = cost_without_battery - peak_cost_no_battery;

    let dispatch = optimize(&hvac_usage, &rates, battery);

    let charge_cost = dispatch.charge_plan.dot(&rates);
    let hvac_from_grid = hvac_usage.minus(&dispatch.discharge_plan);
    let peak_cost_with_battery = hvac_from_grid.dot_where(&rates, |h| window.is_peak(h));
    let off_peak_cost_with_battery = hvac_from_grid.dot_where(&rates, |h| !window.is_peak(h));

    let cost_with_battery = charge_cost + peak_cost_with_battery + off_peak_cost_with_battery;
    let daily_savings = cost_without_battery - cost_with_battery;

    debug!(
        total_hvac_usage,
        cost_without_battery, cost_with_battery, daily_savings, "simulated homeowner day"
    );

    DayResult {
        hvac_usage,
        rates,
        hvac_from_grid,
        dispatch,
        total_hvac_usage,
        cost_without_battery,
        cost_with_battery,
        daily_savings,
        breakdown: CostBreakdown {
            peak_cost_no_battery,
            off_peak_cost_no_battery,
            charge_cost_with_battery: charge_cost,
            peak_cost_with_battery,
            off_peak_cost_with_battery,
        },
    }
}
