//! Fixed-length hourly series and presentation rounding.

use std::ops::Index;

use serde::Serialize;

/// Number of hourly slots in a simulated day.
pub const HOURS_PER_DAY: usize = 24;

/// Decimal places used when presenting money values ($).
pub const MONEY_DP: u32 = 2;
/// Decimal places used for daily and annual energy totals (kWh).
pub const ENERGY_TOTAL_DP: u32 = 2;
/// Decimal places used for hourly energy traces (kWh).
pub const ENERGY_HOURLY_DP: u32 = 3;
/// Decimal places used for hourly rates ($/kWh).
pub const RATE_DP: u32 = 4;

/// One value per hour of the day, indexed by hour (0–23).
///
/// Used for both energy (kWh) and price ($/kWh) series. The length is part of
/// the type, so every curve produced by the crate has exactly 24 entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HourlyProfile([f64; HOURS_PER_DAY]);

impl HourlyProfile {
    /// All-zero profile.
    pub const fn zeros() -> Self {
        Self([0.0; HOURS_PER_DAY])
    }

    /// Builds a profile by evaluating `f` for every hour.
    pub fn from_fn(f: impl FnMut(usize) -> f64) -> Self {
        Self(std::array::from_fn(f))
    }

    pub fn values(&self) -> &[f64; HOURS_PER_DAY] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn set(&mut self, hour: usize, value: f64) {
        self.0[hour] = value;
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Σ `self[h] * other[h]`, e.g. energy times price.
    pub fn dot(&self, other: &Self) -> f64 {
        self.iter().zip(other.iter()).map(|(a, b)| a * b).sum()
    }

    /// Like [`HourlyProfile::dot`], restricted to hours where `include(h)` holds.
    pub fn dot_where(&self, other: &Self, include: impl Fn(usize) -> bool) -> f64 {
        (0..HOURS_PER_DAY)
            .filter(|&h| include(h))
            .map(|h| self.0[h] * other.0[h])
            .sum()
    }

    /// Hour-wise `self - other`.
    pub fn minus(&self, other: &Self) -> Self {
        Self::from_fn(|h| self.0[h] - other.0[h])
    }

    /// Rounded copy for presentation.
    pub fn rounded(&self, dp: u32) -> Vec<f64> {
        self.iter().map(|v| round_dp(v, dp)).collect()
    }
}

impl Index<usize> for HourlyProfile {
    type Output = f64;

    fn index(&self, hour: usize) -> &f64 {
        &self.0[hour]
    }
}

impl From<[f64; HOURS_PER_DAY]> for HourlyProfile {
    fn from(values: [f64; HOURS_PER_DAY]) -> Self {
        Self(values)
    }
}

/// Rounds `value` to `dp` decimal places, halves away from zero.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    let scale = 10_f64.powi(dp as i32);
    (value * scale).round() / scale
}

pub fn round_money(value: f64) -> f64 {
    round_dp(value, MONEY_DP)
}
