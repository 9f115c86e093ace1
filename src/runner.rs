//! One entry point per calculator, from request parameters to results.

use tracing::info;

use crate::config::{
    CiParams, HomeownerParams, PaybackParams, RepParams, ScenarioConfig, YearlyParams,
};
use crate::error::{Error, Result, ValidationError};
use crate::report::{
    CiReport, DayReport, PaybackReport, RepReport, ScenarioReport, YearlyReport,
};
use crate::sim::homeowner::{DayResult, simulate_day};
use crate::sim::yearly::{YearlyBlend, blend_year};
use crate::value::{
    CiCase, HomeownerAnnual, PaybackResult, RepValue, ci_value, payback, rep_value,
};

fn ensure_valid(errors: Vec<ValidationError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidConfig(errors))
    }
}

/// Simulates the requested homeowner day.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if any parameter is out of range.
pub fn run_homeowner(params: &HomeownerParams) -> Result<DayResult> {
    let inputs = params.resolve()?;
    Ok(simulate_day(&inputs.hvac, &inputs.pricing, &inputs.battery))
}

/// Blends the hot, mild and winter archetype days into a year.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if pricing, battery or day counts are
/// invalid.
pub fn run_yearly(params: &YearlyParams) -> Result<YearlyBlend> {
    let inputs = params.resolve()?;
    Ok(blend_year(inputs.counts, &inputs.pricing, &inputs.battery))
}

/// # Errors
///
/// Returns [`Error::InvalidConfig`] if any parameter is out of range.
pub fn run_rep(params: &RepParams) -> Result<RepValue> {
    ensure_valid(params.validate())?;
    Ok(rep_value(&params.inputs(), params.homeowner()))
}

/// # Errors
///
/// Returns [`Error::InvalidConfig`] if any parameter is out of range.
pub fn run_ci(params: &CiParams) -> Result<Vec<CiCase>> {
    ensure_valid(params.validate())?;
    Ok(ci_value(&params.inputs()))
}

/// # Errors
///
/// Returns [`Error::InvalidConfig`] if any parameter is out of range.
pub fn run_payback(params: &PaybackParams) -> Result<PaybackResult> {
    ensure_valid(params.validate())?;
    Ok(payback(&params.inputs()))
}

/// Full-precision results of every calculator for one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRun {
    pub day: DayResult,
    pub year: YearlyBlend,
    pub rep: RepValue,
    pub ci: Vec<CiCase>,
    pub payback: PaybackResult,
}

impl ScenarioRun {
    pub fn report(&self) -> ScenarioReport {
        ScenarioReport {
            homeowner: DayReport::from(&self.day),
            yearly: YearlyReport::from(&self.year),
            rep: RepReport::from(&self.rep),
            ci: CiReport::from(self.ci.as_slice()),
            payback: PaybackReport::from(&self.payback),
        }
    }
}

/// Runs the whole stakeholder chain.
///
/// The yearly blend is computed once. Its savings and shifted energy feed
/// the provider calculation, and its savings feed payback, unless the
/// scenario sets those figures explicitly.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] listing every violation across all
/// sections.
pub fn run_scenario(config: &ScenarioConfig) -> Result<ScenarioRun> {
    ensure_valid(config.validate())?;

    let day = run_homeowner(&config.homeowner)?;
    let year = run_yearly(&config.yearly())?;

    let annual = HomeownerAnnual::from(&year);
    let rep = rep_value(&config.rep.inputs(), config.rep.homeowner_or(annual));
    let ci = ci_value(&config.ci.inputs());
    let payback = payback(&config.payback.inputs_or(year.blended_annual_savings));

    info!(
        daily_savings = day.daily_savings,
        blended_annual_savings = year.blended_annual_savings,
        rep_total_value = rep.total_value,
        payback_years = payback.payback_years,
        "scenario complete"
    );

    Ok(ScenarioRun {
        day,
        year,
        rep,
        ci,
        payback,
    })
}

/// Runs the whole stakeholder chain and rounds it for presentation.
///
/// # Errors
///
/// See [`run_scenario`].
pub fn evaluate_scenario(config: &ScenarioConfig) -> Result<ScenarioReport> {
    Ok(run_scenario(config)?.report())
}
