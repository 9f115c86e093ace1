//! Physical components of a home: the HVAC load and the battery.

/// Stationary home battery parameters.
pub mod battery;
/// Gaussian HVAC load profile generator.
pub mod hvac;

pub use battery::BatteryConfig;
pub use hvac::{HvacLoad, generate_load};
