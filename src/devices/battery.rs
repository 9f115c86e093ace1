use crate::error::ValidationError;
use crate::profile::HOURS_PER_DAY;

/// A home battery that shifts HVAC consumption from expensive to cheap hours.
///
/// `BatteryConfig` holds the capacity, usable state-of-charge window, power
/// limit and round-trip efficiency. Power applies to both charging and
/// discharging; with hourly slots one kW of power moves one kWh per hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryConfig {
    /// Nameplate capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// Lowest state of charge the battery may be drained to (0.0 to 1.0).
    pub min_soc: f64,

    /// Highest state of charge the battery may be filled to (0.0 to 1.0).
    pub max_soc: f64,

    /// Charge and discharge power limit in kilowatts.
    pub power_kw: f64,

    /// Round-trip efficiency (0..1.0].
    pub efficiency: f64,

    /// Number of highest-priced hours the battery discharges in.
    pub discharge_hours: usize,
}

impl BatteryConfig {
    /// Creates a new battery with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Battery capacity in kWh (must be > 0)
    /// * `min_soc` - Lower state-of-charge bound in `[0, 1]`
    /// * `max_soc` - Upper state-of-charge bound in `(min_soc, 1]`
    /// * `power_kw` - Charge/discharge power limit in kW (must be > 0)
    /// * `efficiency` - Round-trip efficiency in `(0, 1]`
    /// * `discharge_hours` - Discharge window length in `[1, 24]`
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a `ValidationError`.
    pub fn new(
        capacity_kwh: f64,
        min_soc: f64,
        max_soc: f64,
        power_kw: f64,
        efficiency: f64,
        discharge_hours: usize,
    ) -> Result<Self, ValidationError> {
        let battery = Self {
            capacity_kwh,
            min_soc,
            max_soc,
            power_kw,
            efficiency,
            discharge_hours,
        };
        match battery.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(battery),
        }
    }

    /// Energy between the two state-of-charge bounds (kWh).
    pub fn effective_capacity_kwh(&self) -> f64 {
        self.capacity_kwh * (self.max_soc - self.min_soc)
    }

    /// Most energy the battery can draw from the grid in one day (kWh).
    pub fn max_daily_charge_kwh(&self) -> f64 {
        self.power_kw * HOURS_PER_DAY as f64
    }

    /// Lists every constraint the parameters violate.
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.capacity_kwh.is_finite() && self.capacity_kwh > 0.0) {
            errors.push(ValidationError::new("batteryCapacity", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.min_soc) {
            errors.push(ValidationError::new("minSoC", "must be in [0.0, 1.0]"));
        }
        if !(self.max_soc <= 1.0 && self.max_soc > self.min_soc) {
            errors.push(ValidationError::new(
                "maxSoC",
                format!("must be in (minSoC, 1.0], got {}", self.max_soc),
            ));
        }
        if !(self.power_kw.is_finite() && self.power_kw > 0.0) {
            errors.push(ValidationError::new("batteryPower", "must be > 0"));
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            errors.push(ValidationError::new(
                "batteryEfficiency",
                "must be in (0.0, 1.0]",
            ));
        }
        if !(1..=HOURS_PER_DAY).contains(&self.discharge_hours) {
            errors.push(ValidationError::new(
                "dischargeDuration",
                format!("must be in [1, 24], got {}", self.discharge_hours),
            ));
        }

        errors
    }
}
