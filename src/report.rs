//! Rounded response records and their text rendering.
//!
//! Calculators keep full precision; the records here are what a caller
//! sees. Money is rounded to cents, scalar energy to hundredths of a kWh,
//! hourly energy traces to Wh and rates to four decimals. Field names
//! serialize to the dashboard's JSON contract.

use std::fmt;

use serde::Serialize;

use crate::profile::{ENERGY_HOURLY_DP, ENERGY_TOTAL_DP, RATE_DP, round_dp, round_money};
use crate::sim::homeowner::{CostBreakdown, DayResult};
use crate::sim::yearly::{DayType, YearlyBlend};
use crate::value::{CiCase, PaybackResult, RepValue};

const KWH_PER_MWH: f64 = 1000.0;
const DOLLARS_PER_MILLION: f64 = 1_000_000.0;
const PAYBACK_DP: u32 = 1;

fn energy(value: f64) -> f64 {
    round_dp(value, ENERGY_TOTAL_DP)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownReport {
    pub peak_cost_no_battery: f64,
    pub off_peak_cost_no_battery: f64,
    pub charge_cost_with_battery: f64,
    pub peak_cost_with_battery: f64,
    pub off_peak_cost_with_battery: f64,
}

impl From<&CostBreakdown> for BreakdownReport {
    fn from(b: &CostBreakdown) -> Self {
        Self {
            peak_cost_no_battery: round_money(b.peak_cost_no_battery),
            off_peak_cost_no_battery: round_money(b.off_peak_cost_no_battery),
            charge_cost_with_battery: round_money(b.charge_cost_with_battery),
            peak_cost_with_battery: round_money(b.peak_cost_with_battery),
            off_peak_cost_with_battery: round_money(b.off_peak_cost_with_battery),
        }
    }
}

/// The five hourly traces of a day, 24 entries each.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyData {
    pub rates: Vec<f64>,
    pub hvac_usage: Vec<f64>,
    pub hvac_from_grid: Vec<f64>,
    pub charge_plan: Vec<f64>,
    pub discharge_plan: Vec<f64>,
}

/// Homeowner day as presented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReport {
    pub daily_savings: f64,
    #[serde(rename = "totalHVACUsage")]
    pub total_hvac_usage: f64,
    pub cost_without_battery: f64,
    pub cost_with_battery: f64,
    pub energy_shifted: f64,
    pub breakdown: BreakdownReport,
    pub hourly_data: HourlyData,
    /// True when the charging plan could not cover the discharge need.
    pub capacity_shortfall: bool,
}

impl From<&DayResult> for DayReport {
    fn from(day: &DayResult) -> Self {
        Self {
            daily_savings: round_money(day.daily_savings),
            total_hvac_usage: energy(day.total_hvac_usage),
            cost_without_battery: round_money(day.cost_without_battery),
            cost_with_battery: round_money(day.cost_with_battery),
            energy_shifted: energy(day.energy_shifted()),
            breakdown: BreakdownReport::from(&day.breakdown),
            hourly_data: HourlyData {
                rates: day.rates.rounded(RATE_DP),
                hvac_usage: day.hvac_usage.rounded(ENERGY_HOURLY_DP),
                hvac_from_grid: day.hvac_from_grid.rounded(ENERGY_HOURLY_DP),
                charge_plan: day.dispatch.charge_plan.rounded(ENERGY_HOURLY_DP),
                discharge_plan: day.dispatch.discharge_plan.rounded(ENERGY_HOURLY_DP),
            },
            capacity_shortfall: day.capacity_shortfall(),
        }
    }
}

impl fmt::Display for DayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HVAC usage:            {:.2} kWh", self.total_hvac_usage)?;
        writeln!(
            f,
            "Cost without battery:  ${:.2} (peak ${:.2}, off-peak ${:.2})",
            self.cost_without_battery,
            self.breakdown.peak_cost_no_battery,
            self.breakdown.off_peak_cost_no_battery
        )?;
        writeln!(
            f,
            "Cost with battery:     ${:.2} (charge ${:.2}, peak ${:.2}, off-peak ${:.2})",
            self.cost_with_battery,
            self.breakdown.charge_cost_with_battery,
            self.breakdown.peak_cost_with_battery,
            self.breakdown.off_peak_cost_with_battery
        )?;
        writeln!(f, "Daily savings:         ${:.2}", self.daily_savings)?;
        writeln!(f, "Energy shifted:        {:.2} kWh", self.energy_shifted)?;
        write!(
            f,
            "Capacity shortfall:    {}",
            yes_no(self.capacity_shortfall)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTypeResults {
    pub hot: DayReport,
    pub mild: DayReport,
    pub winter: DayReport,
}

/// Yearly blend as presented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyReport {
    pub blended_annual_savings: f64,
    pub total_energy_shifted: f64,
    pub avg_daily_energy_shifted: f64,
    pub hot_days: u32,
    pub mild_days: u32,
    pub winter_days: u32,
    pub day_type_results: DayTypeResults,
    pub capacity_shortfall: bool,
}

impl From<&YearlyBlend> for YearlyReport {
    fn from(blend: &YearlyBlend) -> Self {
        Self {
            blended_annual_savings: round_money(blend.blended_annual_savings),
            total_energy_shifted: energy(blend.total_energy_shifted),
            avg_daily_energy_shifted: energy(blend.avg_daily_energy_shifted),
            hot_days: blend.counts.hot_days,
            mild_days: blend.counts.mild_days,
            winter_days: blend.counts.winter_days,
            day_type_results: DayTypeResults {
                hot: DayReport::from(&blend.hot),
                mild: DayReport::from(&blend.mild),
                winter: DayReport::from(&blend.winter),
            },
            capacity_shortfall: blend.capacity_shortfall(),
        }
    }
}

impl YearlyReport {
    fn day(&self, day_type: DayType) -> &DayReport {
        match day_type {
            DayType::Hot => &self.day_type_results.hot,
            DayType::Mild => &self.day_type_results.mild,
            DayType::Winter => &self.day_type_results.winter,
        }
    }

    fn days(&self, day_type: DayType) -> u32 {
        match day_type {
            DayType::Hot => self.hot_days,
            DayType::Mild => self.mild_days,
            DayType::Winter => self.winter_days,
        }
    }
}

impl fmt::Display for YearlyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day_type in DayType::ALL {
            let day = self.day(day_type);
            writeln!(
                f,
                "{:<7}{:>4} days  ${:>6.2}/day  {:>6.2} kWh/day shifted",
                day_type,
                self.days(day_type),
                day.daily_savings,
                day.energy_shifted
            )?;
        }
        writeln!(f, "Blended annual savings:  ${:.2}", self.blended_annual_savings)?;
        writeln!(f, "Energy shifted per year: {:.2} kWh", self.total_energy_shifted)?;
        write!(
            f,
            "Average per day:         {:.2} kWh",
            self.avg_daily_energy_shifted
        )
    }
}

/// Retail provider value as presented ($ per year unless noted).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepReport {
    /// kWh per home.
    pub avg_daily_energy_shifted: f64,
    /// kWh across the fleet.
    pub avg_daily_fleet_shifted: f64,
    /// MWh across the fleet per year.
    pub total_energy_shifted: f64,
    pub wholesale_cost_savings: f64,
    pub retail_revenue_loss: f64,
    pub net_margin_improvement: f64,
    pub ancillary_revenue: f64,
    pub total_value: f64,
    /// Same as `wholesale_cost_savings`, kept for older dashboard clients.
    pub wholesale_savings: f64,
}

impl From<&RepValue> for RepReport {
    fn from(v: &RepValue) -> Self {
        Self {
            avg_daily_energy_shifted: energy(v.avg_daily_energy_shifted),
            avg_daily_fleet_shifted: energy(v.avg_daily_fleet_shifted),
            total_energy_shifted: energy(v.fleet_annual_shift_kwh / KWH_PER_MWH),
            wholesale_cost_savings: round_money(v.wholesale_cost_savings),
            retail_revenue_loss: round_money(v.retail_revenue_loss),
            net_margin_improvement: round_money(v.net_margin_improvement),
            ancillary_revenue: round_money(v.ancillary_revenue),
            total_value: round_money(v.total_value),
            wholesale_savings: round_money(v.wholesale_cost_savings),
        }
    }
}

impl fmt::Display for RepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Fleet energy shifted:    {:.2} MWh/yr ({:.2} kWh/day)",
            self.total_energy_shifted, self.avg_daily_fleet_shifted
        )?;
        writeln!(f, "Wholesale cost savings:  ${:.2}", self.wholesale_cost_savings)?;
        writeln!(f, "Retail revenue loss:     ${:.2}", self.retail_revenue_loss)?;
        writeln!(f, "Net margin improvement:  ${:.2}", self.net_margin_improvement)?;
        writeln!(f, "Ancillary revenue:       ${:.2}", self.ancillary_revenue)?;
        write!(f, "Total value:             ${:.2}", self.total_value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CiCaseReport {
    #[serde(rename = "loadMW")]
    pub load_mw: u32,
    /// $M per year.
    #[serde(rename = "annualizedNPV")]
    pub annualized_npv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CiReport {
    pub cases: Vec<CiCaseReport>,
}

impl From<&[CiCase]> for CiReport {
    fn from(cases: &[CiCase]) -> Self {
        Self {
            cases: cases
                .iter()
                .map(|c| CiCaseReport {
                    load_mw: c.load_mw,
                    annualized_npv: round_money(c.annualized_npv / DOLLARS_PER_MILLION),
                })
                .collect(),
        }
    }
}

impl fmt::Display for CiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for case in &self.cases {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(
                f,
                "{:>3} MW project:  ${:.2}M/yr annualized NPV advantage",
                case.load_mw, case.annualized_npv
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaybackReport {
    pub net_cost: f64,
    pub federal_credit: f64,
    pub annual_savings: f64,
    pub payback_years: f64,
}

impl From<&PaybackResult> for PaybackReport {
    fn from(p: &PaybackResult) -> Self {
        Self {
            net_cost: round_money(p.net_cost),
            federal_credit: round_money(p.federal_credit),
            annual_savings: round_money(p.annual_savings),
            payback_years: round_dp(p.payback_years, PAYBACK_DP),
        }
    }
}

impl fmt::Display for PaybackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Federal credit:  ${:.2}", self.federal_credit)?;
        writeln!(f, "Net cost:        ${:.2}", self.net_cost)?;
        writeln!(f, "Annual savings:  ${:.2}", self.annual_savings)?;
        if self.annual_savings > 0.0 {
            write!(f, "Payback:         {:.1} years", self.payback_years)
        } else {
            write!(f, "Payback:         n/a")
        }
    }
}

/// Every stakeholder's view of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub homeowner: DayReport,
    pub yearly: YearlyReport,
    pub rep: RepReport,
    pub ci: CiReport,
    pub payback: PaybackReport,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Homeowner Day ---\n{}\n", self.homeowner)?;
        writeln!(f, "--- Homeowner Year ---\n{}\n", self.yearly)?;
        writeln!(f, "--- Retail Provider ---\n{}\n", self.rep)?;
        writeln!(f, "--- C&I Operator ---\n{}\n", self.ci)?;
        write!(f, "--- Payback ---\n{}", self.payback)
    }
}
