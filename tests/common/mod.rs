//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use hvac_battery_value::devices::{BatteryConfig, HvacLoad};
use hvac_battery_value::tariff::{PricingConfig, TouSchedule};

/// Default TOU window ($0.28 peak 14:00–19:00, $0.12 otherwise).
pub fn default_tou() -> TouSchedule {
    TouSchedule::new(0.28, 0.12, 14, 19).unwrap()
}

pub fn default_pricing() -> PricingConfig {
    PricingConfig::TimeOfUse(default_tou())
}

/// Default battery (10 kWh, 10–90% SoC, 5 kW, 85% efficiency, 4 h discharge).
pub fn default_battery() -> BatteryConfig {
    BatteryConfig::new(10.0, 0.1, 0.9, 5.0, 0.85, 4).unwrap()
}

/// Hot summer day (3.5 kW peak at 16:00, shape 5).
pub fn hot_day_load() -> HvacLoad {
    HvacLoad::new(3.5, 16, 5.0).unwrap()
}

/// A spread of valid loads for property checks.
pub fn sample_loads() -> Vec<HvacLoad> {
    let mut loads = Vec::new();
    for peak_kw in [0.5, 2.0, 3.5, 6.0] {
        for peak_hour in [0, 7, 16, 23] {
            for shape in [1.0, 5.5, 10.0] {
                loads.push(HvacLoad::new(peak_kw, peak_hour, shape).unwrap());
            }
        }
    }
    loads
}

/// A spread of valid batteries, including a small one that runs short.
pub fn sample_batteries() -> Vec<BatteryConfig> {
    vec![
        default_battery(),
        BatteryConfig::new(5.0, 0.2, 0.8, 2.5, 0.9, 2).unwrap(),
        BatteryConfig::new(20.0, 0.0, 1.0, 10.0, 1.0, 6).unwrap(),
        BatteryConfig::new(13.5, 0.05, 0.95, 0.1, 0.9, 24).unwrap(),
    ]
}
