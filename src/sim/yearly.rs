//! Annual figures blended from hot, mild, and winter archetype days.

use std::fmt;

use tracing::debug;

use crate::devices::{BatteryConfig, HvacLoad};
use crate::error::ValidationError;
use crate::profile::{ENERGY_TOTAL_DP, round_dp, round_money};
use crate::sim::homeowner::{DayResult, simulate_day};
use crate::tariff::PricingConfig;

pub const DAYS_PER_YEAR: u32 = 365;

/// Archetype days the year is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayType {
    Hot,
    Mild,
    Winter,
}

impl DayType {
    pub const ALL: [Self; 3] = [Self::Hot, Self::Mild, Self::Winter];

    /// HVAC load for this archetype. Pricing and battery come from the request.
    pub const fn preset(self) -> HvacLoad {
        match self {
            Self::Hot => HvacLoad {
                peak_kw: 3.5,
                peak_hour: 16,
                shape: 5.0,
            },
            Self::Mild => HvacLoad {
                peak_kw: 1.5,
                peak_hour: 15,
                shape: 3.0,
            },
            Self::Winter => HvacLoad {
                peak_kw: 2.5,
                peak_hour: 7,
                shape: 6.0,
            },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Mild => "mild",
            Self::Winter => "winter",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many days of each archetype make up the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCounts {
    pub hot_days: u32,
    pub mild_days: u32,
    pub winter_days: u32,
}

impl DayCounts {
    /// Derives winter days as the remainder of the year.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if `hot_days + mild_days` exceeds 365.
    pub fn new(hot_days: u32, mild_days: u32) -> Result<Self, ValidationError> {
        let winter_days = hot_days
            .checked_add(mild_days)
            .and_then(|warm| DAYS_PER_YEAR.checked_sub(warm))
            .ok_or_else(|| {
                ValidationError::new(
                    "mildDays",
                    format!(
                        "hotDays + mildDays must be <= {DAYS_PER_YEAR}, got {hot_days} + {mild_days}"
                    ),
                )
            })?;
        Ok(Self {
            hot_days,
            mild_days,
            winter_days,
        })
    }

    pub fn days(&self, day_type: DayType) -> u32 {
        match day_type {
            DayType::Hot => self.hot_days,
            DayType::Mild => self.mild_days,
            DayType::Winter => self.winter_days,
        }
    }
}

/// Annual aggregates and the archetype days they were built from.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyBlend {
    pub counts: DayCounts,
    /// Σ days × rounded daily savings ($).
    pub blended_annual_savings: f64,
    /// Σ days × rounded energy shifted (kWh).
    pub total_energy_shifted: f64,
    /// `total_energy_shifted / 365` (kWh).
    pub avg_daily_energy_shifted: f64,
    pub hot: DayResult,
    pub mild: DayResult,
    pub winter: DayResult,
}

impl YearlyBlend {
    pub fn day(&self, day_type: DayType) -> &DayResult {
        match day_type {
            DayType::Hot => &self.hot,
            DayType::Mild => &self.mild,
            DayType::Winter => &self.winter,
        }
    }

    /// Whether any archetype day under-delivered its charging plan.
    pub fn capacity_shortfall(&self) -> bool {
        DayType::ALL
            .iter()
            .any(|&t| self.day(t).capacity_shortfall())
    }
}

/// Runs each archetype day and weights it by its day count.
///
/// Weights apply to the per-day figures as presented (savings to cents,
/// energy to hundredths of a kWh), so annual totals agree with the day
/// reports a user sees.
pub fn blend_year(
    counts: DayCounts,
    pricing: &PricingConfig,
    battery: &BatteryConfig,
) -> YearlyBlend {
    let hot = simulate_day(&DayType::Hot.preset(), pricing, battery);
    let mild = simulate_day(&DayType::Mild.preset(), pricing, battery);
    let winter = simulate_day(&DayType::Winter.preset(), pricing, battery);

    let weighted = |value: fn(&DayResult) -> f64| -> f64 {
        f64::from(counts.hot_days) * value(&hot)
            + f64::from(counts.mild_days) * value(&mild)
            + f64::from(counts.winter_days) * value(&winter)
    };

    let blended_annual_savings = weighted(|d| round_money(d.daily_savings));
    let total_energy_shifted = weighted(|d| round_dp(d.energy_shifted(), ENERGY_TOTAL_DP));
    let avg_daily_energy_shifted = total_energy_shifted / f64::from(DAYS_PER_YEAR);

    debug!(
        hot_days = counts.hot_days,
        mild_days = counts.mild_days,
        winter_days = counts.winter_days,
        blended_annual_savings,
        total_energy_shifted,
        "blended year"
    );

    YearlyBlend {
        counts,
        blended_annual_savings,
        total_energy_shifted,
        avg_daily_energy_shifted,
        hot,
        mild,
        winter,
    }
}
