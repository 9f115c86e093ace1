//! Greedy merit-order battery dispatch.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::devices::BatteryConfig;
use crate::error::ComputationError;
use crate::profile::{HOURS_PER_DAY, HourlyProfile};

/// Whether the charging schedule delivered everything the discharge plan needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchStatus {
    /// Charging covered the full grid draw required.
    FullyMet,
    /// `24 * power` was not enough to draw `requested_kwh` from the grid.
    CapacityShortfall {
        requested_kwh: f64,
        delivered_kwh: f64,
    },
}

/// Hour-by-hour charge and discharge decisions for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    /// Grid energy drawn into the battery per hour (kWh).
    pub charge_plan: HourlyProfile,
    /// Energy delivered from the battery to the HVAC load per hour (kWh).
    pub discharge_plan: HourlyProfile,
    /// Energy the plan stores for the discharge window (kWh).
    pub energy_stored: f64,
    /// Grid energy needed to net `energy_stored` after losses (kWh).
    pub energy_to_charge: f64,
    /// Hours selected for discharging, in chronological order.
    pub discharge_hours: Vec<usize>,
    pub status: DispatchStatus,
}

impl DispatchPlan {
    pub fn has_shortfall(&self) -> bool {
        matches!(self.status, DispatchStatus::CapacityShortfall { .. })
    }

    /// Returns the plan only if charging fully covered the discharge window.
    ///
    /// # Errors
    ///
    /// Returns `ComputationError::CapacityShortfall` otherwise.
    pub fn require_fully_met(&self) -> Result<&Self, ComputationError> {
        match self.status {
            DispatchStatus::FullyMet => Ok(self),
            DispatchStatus::CapacityShortfall {
                requested_kwh,
                delivered_kwh,
            } => Err(ComputationError::CapacityShortfall {
                requested_kwh,
                delivered_kwh,
            }),
        }
    }
}

/// Hours ordered by rate, ties broken by hour ascending.
fn hours_by_rate(rates: &HourlyProfile, descending: bool) -> Vec<usize> {
    let mut hours: Vec<usize> = (0..HOURS_PER_DAY).collect();
    // Stable sort keeps equal rates in chronological order.
    hours.sort_by(|&a, &b| {
        let ord = rates[a].partial_cmp(&rates[b]).unwrap_or(Ordering::Equal);
        if descending { ord.reverse() } else { ord }
    });
    hours
}

/// Plans one day of battery operation against `load` and `rates`.
///
/// This is a decoupled heuristic rather than a joint optimizer:
///
/// 1. The `discharge_hours` most expensive hours form the discharge window.
/// 2. The battery stores the window's load, capped at the usable capacity.
/// 3. Grid draw of `stored / efficiency` is spread over the cheapest hours,
///    at most `power_kw` per hour.
/// 4. The window is drained chronologically, each hour limited by its load,
///    the power limit and what is left in the battery.
///
/// If the cheapest-first charging cannot draw enough energy in 24 hours the
/// plan is returned with [`DispatchStatus::CapacityShortfall`]. The discharge
/// side still assumes the full stored energy, so callers should check the
/// status before trusting savings derived from a short plan.
///
/// `battery` must be valid ([`BatteryConfig::violations`] empty). A zero
/// efficiency or power would otherwise yield infinite or NaN energies. Build
/// it with [`BatteryConfig::new`] or validate a struct literal first; debug
/// builds assert this.
pub fn optimize(
    load: &HourlyProfile,
    rates: &HourlyProfile,
    battery: &BatteryConfig,
) -> DispatchPlan {
    debug_assert!(
        battery.violations().is_empty(),
        "optimize called with an invalid battery: {battery:?}"
    );
    let mut discharge_hours: Vec<usize> = hours_by_rate(rates, true)
        .into_iter()
        .take(battery.discharge_hours)
        .collect();

    let energy_needed: f64 = discharge_hours.iter().map(|&h| load[h]).sum();
    let energy_stored = energy_needed.min(battery.effective_capacity_kwh());
    let energy_to_charge = energy_stored / battery.efficiency;

    let mut charge_plan = HourlyProfile::zeros();
    let mut remaining = energy_to_charge;
    for hour in hours_by_rate(rates, false) {
        if remaining <= 0.0 {
            break;
        }
        let kwh = remaining.min(battery.power_kw);
        charge_plan.set(hour, kwh);
        remaining -= kwh;
    }

    let status = if remaining > 1e-9 {
        let delivered_kwh = energy_to_charge - remaining;
        warn!(
            requested_kwh = energy_to_charge,
            delivered_kwh, "battery power too low to charge for the discharge window"
        );
        DispatchStatus::CapacityShortfall {
            requested_kwh: energy_to_charge,
            delivered_kwh,
        }
    } else {
        DispatchStatus::FullyMet
    };

    discharge_hours.sort_unstable();
    let mut discharge_plan = HourlyProfile::zeros();
    let mut available = energy_stored;
    for &hour in &discharge_hours {
        if available <= 0.0 {
            break;
        }
        let kwh = load[hour].min(battery.power_kw).min(available);
        discharge_plan.set(hour, kwh);
        available -= kwh;
    }

    debug!(
        ?discharge_hours,
        energy_needed, energy_stored, energy_to_charge, "planned dispatch"
    );

    DispatchPlan {
        charge_plan,
        discharge_plan,
        energy_stored,
        energy_to_charge,
        discharge_hours,
        status,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::devices::generate_load;
    use crate::tariff::TouSchedule;

    fn default_battery() -> BatteryConfig {
        BatteryConfig::new(10.0, 0.1, 0.9, 5.0, 0.85, 4).unwrap()
    }

    fn tou_rates() -> HourlyProfile {
        TouSchedule::new(0.28, 0.12, 14, 19).unwrap().rates()
    }

    #[test]
    fn discharge_window_prefers_earliest_tied_hours() {
        let load = generate_load(3.5, 16, 5.0).unwrap();
        let plan = optimize(&load, &tou_rates(), &default_battery());
        assert_eq!(plan.discharge_hours, vec![14, 15, 16, 17]);
    }

    #[test]
    fn hot_day_stores_effective_capacity() {
        let load = generate_load(3.5, 16, 5.0).unwrap();
        let plan = optimize(&load, &tou_rates(), &default_battery());
        assert_abs_diff_eq!(plan.energy_stored, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(plan.energy_to_charge, 8.0 / 0.85, epsilon = 1e-12);
        assert_eq!(plan.status, DispatchStatus::FullyMet);
    }

    #[test]
    fn charging_fills_cheapest_hours_first() {
        let load = generate_load(3.5, 16, 5.0).unwrap();
        let plan = optimize(&load, &tou_rates(), &default_battery());
        assert_eq!(plan.charge_plan[0], 5.0);
        assert_abs_diff_eq!(plan.charge_plan[1], 8.0 / 0.85 - 5.0, epsilon = 1e-12);
        assert!((2..24).all(|h| plan.charge_plan[h] == 0.0));
        assert_abs_diff_eq!(plan.charge_plan.total(), plan.energy_to_charge, epsilon = 1e-12);
    }

    #[test]
    fn discharge_runs_chronologically_until_empty() {
        let load = generate_load(3.5, 16, 5.0).unwrap();
        let plan = optimize(&load, &tou_rates(), &default_battery());
        assert_abs_diff_eq!(plan.discharge_plan[14], load[14], epsilon = 1e-12);
        assert_abs_diff_eq!(plan.discharge_plan[15], load[15], epsilon = 1e-12);
        assert_abs_diff_eq!(
            plan.discharge_plan[16],
            8.0 - load[14] - load[15],
            epsilon = 1e-9
        );
        assert_eq!(plan.discharge_plan[17], 0.0);
        assert_abs_diff_eq!(plan.discharge_plan.total(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn plan_respects_power_and_load_caps() {
        let load = generate_load(6.0, 16, 9.0).unwrap();
        let battery = BatteryConfig::new(20.0, 0.0, 1.0, 2.0, 0.9, 6).unwrap();
        let plan = optimize(&load, &tou_rates(), &battery);
        for h in 0..HOURS_PER_DAY {
            assert!(plan.charge_plan[h] <= battery.power_kw);
            assert!(plan.discharge_plan[h] <= load[h].min(battery.power_kw));
        }
        assert!(plan.energy_stored <= battery.effective_capacity_kwh());
    }

    #[test]
    fn small_load_stores_only_what_is_needed() {
        let load = generate_load(0.5, 16, 10.0).unwrap();
        let plan = optimize(&load, &tou_rates(), &default_battery());
        let needed: f64 = [14, 15, 16, 17].iter().map(|&h| load[h]).sum();
        assert_abs_diff_eq!(plan.energy_stored, needed, epsilon = 1e-12);
    }

    #[test]
    fn low_power_battery_reports_shortfall() {
        let load = generate_load(3.5, 16, 5.0).unwrap();
        let battery = BatteryConfig::new(10.0, 0.0, 1.0, 0.1, 0.5, 4).unwrap();
        let plan = optimize(&load, &tou_rates(), &battery);
        assert!(plan.has_shortfall());
        let DispatchStatus::CapacityShortfall {
            requested_kwh,
            delivered_kwh,
        } = plan.status
        else {
            panic!("expected shortfall");
        };
        assert_abs_diff_eq!(delivered_kwh, 2.4, epsilon = 1e-9);
        assert!(requested_kwh > delivered_kwh);
        assert!(plan.require_fully_met().is_err());
    }

    #[test]
    fn fully_met_plan_passes_strict_check() {
        let load = generate_load(3.5, 16, 5.0).unwrap();
        let plan = optimize(&load, &tou_rates(), &default_battery());
        assert!(plan.require_fully_met().is_ok());
    }

    #[test]
    fn rtp_discharges_in_priciest_hours() {
        let load = HourlyProfile::from_fn(|_| 1.0);
        let mut rates = HourlyProfile::from_fn(|_| 0.1);
        rates.set(3, 0.5);
        rates.set(20, 0.9);
        let battery = BatteryConfig::new(10.0, 0.1, 0.9, 5.0, 1.0, 2).unwrap();
        let plan = optimize(&load, &rates, &battery);
        assert_eq!(plan.discharge_hours, vec![3, 20]);
        assert_eq!(plan.discharge_plan[3], 1.0);
        assert_eq!(plan.discharge_plan[20], 1.0);
        // cheapest hours tie at 0.1, so charging starts at hour 0
        assert_eq!(plan.charge_plan[0], 2.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid battery")]
    fn unvalidated_battery_is_caught_in_debug_builds() {
        let battery = BatteryConfig {
            efficiency: 0.0,
            ..default_battery()
        };
        let load = generate_load(3.5, 16, 5.0).unwrap();
        optimize(&load, &tou_rates(), &battery);
    }
}
