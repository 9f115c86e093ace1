use tracing::debug;

use crate::error::ValidationError;
use crate::profile::{HOURS_PER_DAY, HourlyProfile};

/// Sharpest allowed load shape (narrowest peak).
pub const MAX_LOAD_SHAPE: f64 = 10.0;
/// Flattest allowed load shape.
pub const MIN_LOAD_SHAPE: f64 = 1.0;

/// A synthetic HVAC load that peaks once per day.
///
/// `HvacLoad` models daily air-conditioning or heating consumption as a
/// Gaussian kernel centered on `peak_hour`. The `shape` parameter controls
/// how concentrated the consumption is around the peak.
///
/// # Examples
///
/// ```
/// use hvac_battery_value::devices::hvac::HvacLoad;
///
/// // A hot summer afternoon
/// let hvac = HvacLoad::new(
///     3.5, // peak_kw - consumption at the peak hour
///     16,  // peak_hour - 4 PM
///     5.0, // shape - medium peak
/// )
/// .unwrap();
///
/// let usage = hvac.profile();
/// assert_eq!(usage[16], 3.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HvacLoad {
    /// Consumption at the peak hour (kW, equal to kWh over one hour).
    pub peak_kw: f64,

    /// Hour of day (0–23) where consumption peaks.
    pub peak_hour: usize,

    /// Peakiness in `[1, 10]`; higher is sharper. Fractional values are
    /// allowed.
    pub shape: f64,
}

impl HvacLoad {
    /// Creates a validated HVAC load.
    ///
    /// # Arguments
    ///
    /// * `peak_kw` - Consumption at the peak hour (must be > 0)
    /// * `peak_hour` - Hour of the peak (0–23)
    /// * `shape` - Shape parameter in `[1, 10]`
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for any out-of-range argument. A shape of
    /// 11 would make the spread zero, so it is rejected here rather than
    /// computed.
    pub fn new(peak_kw: f64, peak_hour: usize, shape: f64) -> Result<Self, ValidationError> {
        let hvac = Self {
            peak_kw,
            peak_hour,
            shape,
        };
        match hvac.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(hvac),
        }
    }

    /// Lists every constraint the parameters violate.
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(self.peak_kw.is_finite() && self.peak_kw > 0.0) {
            errors.push(ValidationError::new(
                "hvacConsumption",
                format!("must be a finite number > 0, got {}", self.peak_kw),
            ));
        }
        if self.peak_hour >= HOURS_PER_DAY {
            errors.push(ValidationError::new(
                "hvacPeakTime",
                format!("must be in [0, 23], got {}", self.peak_hour),
            ));
        }
        // NaN fails the range check
        if !(MIN_LOAD_SHAPE..=MAX_LOAD_SHAPE).contains(&self.shape) {
            errors.push(ValidationError::new(
                "hvacLoadShape",
                format!(
                    "must be in [{MIN_LOAD_SHAPE}, {MAX_LOAD_SHAPE}], got {}",
                    self.shape
                ),
            ));
        }
        errors
    }

    /// Standard deviation of the kernel in hours: `11 - shape`.
    pub fn spread_hours(&self) -> f64 {
        MAX_LOAD_SHAPE + 1.0 - self.shape
    }

    /// Consumption during `hour` (kWh).
    ///
    /// Distance to the peak is linear, not wrapped around midnight, so a
    /// peak near hour 0 or 23 produces an asymmetric day.
    pub fn usage_kwh(&self, hour: usize) -> f64 {
        let spread = self.spread_hours();
        let distance = hour as f64 - self.peak_hour as f64;
        self.peak_kw * (-(distance * distance) / (2.0 * spread * spread)).exp()
    }

    /// The full 24-hour usage curve.
    pub fn profile(&self) -> HourlyProfile {
        let profile = HourlyProfile::from_fn(|h| self.usage_kwh(h));
        debug!(
            peak_kw = self.peak_kw,
            peak_hour = self.peak_hour,
            shape = self.shape,
            total_kwh = profile.total(),
            "generated hvac load"
        );
        profile
    }
}

/// Convenience wrapper: validate the parameters and return the load curve.
///
/// # Errors
///
/// See [`HvacLoad::new`].
pub fn generate_load(
    peak_kw: f64,
    peak_hour: usize,
    shape: f64,
) -> Result<HourlyProfile, ValidationError> {
    Ok(HvacLoad::new(peak_kw, peak_hour, shape)?.profile())
}
