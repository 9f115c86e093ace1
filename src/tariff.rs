//! Hourly electricity price curves for time-of-use and real-time pricing.

use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::profile::{HOURS_PER_DAY, HourlyProfile};

/// A two-level time-of-use tariff with a single peak window.
///
/// The window is half-open: `peak_start` is a peak hour, `peak_end` is not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouSchedule {
    /// Price inside the peak window ($/kWh).
    pub peak_rate: f64,
    /// Price outside the peak window ($/kWh).
    pub off_peak_rate: f64,
    /// First peak hour (inclusive).
    pub peak_start: usize,
    /// End of the peak window (exclusive, at most 24).
    pub peak_end: usize,
}

impl TouSchedule {
    /// Creates a validated schedule.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if a rate is negative or not finite, or if
    /// the window does not satisfy `0 <= peak_start < peak_end <= 24`.
    pub fn new(
        peak_rate: f64,
        off_peak_rate: f64,
        peak_start: usize,
        peak_end: usize,
    ) -> Result<Self, ValidationError> {
        let schedule = Self {
            peak_rate,
            off_peak_rate,
            peak_start,
            peak_end,
        };
        match schedule.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(schedule),
        }
    }

    /// Whether `hour` falls in the peak window.
    pub fn is_peak(&self, hour: usize) -> bool {
        (self.peak_start..self.peak_end).contains(&hour)
    }

    pub fn rate_at(&self, hour: usize) -> f64 {
        if self.is_peak(hour) {
            self.peak_rate
        } else {
            self.off_peak_rate
        }
    }

    pub fn rates(&self) -> HourlyProfile {
        HourlyProfile::from_fn(|h| self.rate_at(h))
    }

    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(self.peak_rate.is_finite() && self.peak_rate >= 0.0) {
            errors.push(ValidationError::new("peakRate", "must be >= 0"));
        }
        if !(self.off_peak_rate.is_finite() && self.off_peak_rate >= 0.0) {
            errors.push(ValidationError::new("offPeakRate", "must be >= 0"));
        }
        if self.peak_end > HOURS_PER_DAY {
            errors.push(ValidationError::new(
                "peakEnd",
                format!("must be <= 24, got {}", self.peak_end),
            ));
        }
        if self.peak_start >= self.peak_end {
            errors.push(ValidationError::new(
                "peakStart",
                format!(
                    "must be < peakEnd ({} >= {})",
                    self.peak_start, self.peak_end
                ),
            ));
        }
        errors
    }
}

/// The pricing model active for one calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum PricingConfig {
    /// Two-level tariff with a peak window.
    TimeOfUse(TouSchedule),
    /// Caller-supplied hourly prices.
    ///
    /// `window` is still used to split costs into peak and off-peak for
    /// reporting, and supplies the fallback curve when `hourly_prices` is
    /// empty.
    RealTimePrice {
        hourly_prices: Vec<f64>,
        window: TouSchedule,
    },
}

impl PricingConfig {
    /// The peak window used for cost breakdowns.
    pub fn window(&self) -> &TouSchedule {
        match self {
            Self::TimeOfUse(schedule) => schedule,
            Self::RealTimePrice { window, .. } => window,
        }
    }

    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = self.window().violations();
        if let Self::RealTimePrice { hourly_prices, .. } = self {
            if let Some((hour, price)) = hourly_prices
                .iter()
                .enumerate()
                .find(|(_, p)| !(p.is_finite() && **p >= 0.0))
            {
                errors.push(ValidationError::new(
                    "hourlyPrices",
                    format!("entry {hour} must be a finite number >= 0, got {price}"),
                ));
            }
        }
        errors
    }
}

/// Builds the 24-hour price curve for `config`.
///
/// Real-time price lists shorter than a day are padded by repeating the last
/// price and longer lists are truncated. An empty list falls back to the
/// time-of-use curve of the supplied window, matching how the dashboard has
/// always treated an RTP request without prices.
pub fn build_rates(config: &PricingConfig) -> HourlyProfile {
    match config {
        PricingConfig::TimeOfUse(schedule) => schedule.rates(),
        PricingConfig::RealTimePrice {
            hourly_prices,
            window,
        } => {
            if hourly_prices.is_empty() {
                warn!("real-time pricing selected without prices, using time-of-use window");
                return window.rates();
            }
            if hourly_prices.len() != HOURS_PER_DAY {
                debug!(
                    supplied = hourly_prices.len(),
                    "fitting real-time prices to 24 hours"
                );
            }
            fit_to_day(hourly_prices)
        }
    }
}

/// Pads (with the last value) or truncates `prices` to exactly 24 hours.
///
/// An empty slice yields an all-zero day.
pub fn fit_to_day(prices: &[f64]) -> HourlyProfile {
    let last = prices.last().copied().unwrap_or(0.0);
    HourlyProfile::from_fn(|h| prices.get(h).copied().unwrap_or(last))
}
