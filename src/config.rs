//! Request parameters and TOML scenario files.
//!
//! Every request struct deserializes from the camelCase field names of the
//! dashboard contract, with each field optional and defaulted. A
//! [`ScenarioConfig`] groups one section per calculator so a whole
//! stakeholder chain can be described in a single TOML file.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::devices::{BatteryConfig, HvacLoad};
use crate::error::{Error, Result, ValidationError};
use crate::sim::yearly::DayCounts;
use crate::tariff::{PricingConfig, TouSchedule};
use crate::value::{CiInputs, HomeownerAnnual, PaybackInputs, RepInputs};

const KWH_PER_MWH: f64 = 1000.0;
const PERCENT: f64 = 100.0;

/// Parses any request struct from JSON.
///
/// # Errors
///
/// Returns [`Error::Json`] if the document is malformed or a field has the
/// wrong type.
pub fn from_json<T: DeserializeOwned>(s: &str) -> Result<T> {
    Ok(serde_json::from_str(s)?)
}

/// How the hourly price curve is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingModel {
    /// Two-level time-of-use tariff.
    #[default]
    Tou,
    /// Caller-supplied hourly prices.
    Rtp,
}

/// Parameters for one homeowner day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeownerParams {
    pub pricing_model: PricingModel,
    /// $/kWh inside the peak window.
    pub peak_rate: f64,
    /// $/kWh outside the peak window.
    pub off_peak_rate: f64,
    pub peak_start: usize,
    pub peak_end: usize,
    /// $/kWh per hour, used when `pricing_model` is `rtp`.
    pub hourly_prices: Vec<f64>,
    /// HVAC consumption at the peak hour (kW).
    pub hvac_consumption: f64,
    pub hvac_peak_time: usize,
    pub hvac_load_shape: f64,
    /// kWh.
    pub battery_capacity: f64,
    #[serde(rename = "minSoC")]
    pub min_soc: f64,
    #[serde(rename = "maxSoC")]
    pub max_soc: f64,
    /// Number of discharge hours.
    pub discharge_duration: usize,
    /// kW.
    pub battery_power: f64,
    pub battery_efficiency: f64,
}

impl Default for HomeownerParams {
    fn default() -> Self {
        Self {
            pricing_model: PricingModel::Tou,
            peak_rate: 0.28,
            off_peak_rate: 0.12,
            peak_start: 14,
            peak_end: 19,
            hourly_prices: Vec::new(),
            hvac_consumption: 3.5,
            hvac_peak_time: 16,
            hvac_load_shape: 5.0,
            battery_capacity: 10.0,
            min_soc: 0.1,
            max_soc: 0.9,
            discharge_duration: 4,
            battery_power: 5.0,
            battery_efficiency: 0.85,
        }
    }
}

/// Validated inputs for one homeowner day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayInputs {
    pub hvac: HvacLoad,
    pub pricing: PricingConfig,
    pub battery: BatteryConfig,
}

impl HomeownerParams {
    pub fn pricing(&self) -> PricingConfig {
        let window = TouSchedule {
            peak_rate: self.peak_rate,
            off_peak_rate: self.off_peak_rate,
            peak_start: self.peak_start,
            peak_end: self.peak_end,
        };
        match self.pricing_model {
            PricingModel::Tou => PricingConfig::TimeOfUse(window),
            PricingModel::Rtp => PricingConfig::RealTimePrice {
                hourly_prices: self.hourly_prices.clone(),
                window,
            },
        }
    }

    pub fn hvac(&self) -> HvacLoad {
        HvacLoad {
            peak_kw: self.hvac_consumption,
            peak_hour: self.hvac_peak_time,
            shape: self.hvac_load_shape,
        }
    }

    pub fn battery(&self) -> BatteryConfig {
        BatteryConfig {
            capacity_kwh: self.battery_capacity,
            min_soc: self.min_soc,
            max_soc: self.max_soc,
            power_kw: self.battery_power,
            efficiency: self.battery_efficiency,
            discharge_hours: self.discharge_duration,
        }
    }

    /// Validates pricing and battery, the parts shared with yearly requests.
    fn tariff_and_battery_violations(&self) -> Vec<ValidationError> {
        let mut errors = self.pricing().violations();
        errors.extend(self.battery().violations());
        errors
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the parameters are valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.tariff_and_battery_violations();
        errors.extend(self.hvac().violations());
        errors
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] listing every violated constraint.
    pub fn resolve(&self) -> Result<DayInputs> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(Error::InvalidConfig(errors));
        }
        Ok(DayInputs {
            hvac: self.hvac(),
            pricing: self.pricing(),
            battery: self.battery(),
        })
    }
}

/// How the year splits into archetype days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YearParams {
    pub hot_days: u32,
    pub mild_days: u32,
}

impl Default for YearParams {
    fn default() -> Self {
        Self {
            hot_days: 90,
            mild_days: 180,
        }
    }
}

impl YearParams {
    /// # Errors
    ///
    /// Returns a `ValidationError` if the warm days exceed the year.
    pub fn counts(&self) -> Result<DayCounts, ValidationError> {
        DayCounts::new(self.hot_days, self.mild_days)
    }
}

/// Parameters for the yearly blend: pricing and battery from the homeowner
/// fields plus the day split. HVAC fields are accepted and ignored since
/// each archetype day brings its own load.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct YearlyParams {
    #[serde(flatten)]
    pub homeowner: HomeownerParams,
    #[serde(flatten)]
    pub year: YearParams,
}

/// Validated inputs for the yearly blend.
#[derive(Debug, Clone, PartialEq)]
pub struct YearInputs {
    pub counts: DayCounts,
    pub pricing: PricingConfig,
    pub battery: BatteryConfig,
}

impl YearlyParams {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.homeowner.tariff_and_battery_violations();
        errors.extend(self.year.counts().err());
        errors
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] listing every violated constraint.
    pub fn resolve(&self) -> Result<YearInputs> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(Error::InvalidConfig(errors));
        }
        Ok(YearInputs {
            counts: self.year.counts()?,
            pricing: self.homeowner.pricing(),
            battery: self.homeowner.battery(),
        })
    }
}

/// Retail provider parameters. Wholesale prices are in $/MWh.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepParams {
    pub rep_homes: u32,
    pub wholesale_peak: f64,
    pub wholesale_off_peak: f64,
    /// $/kW-month.
    pub ancillary_value: f64,
    /// kW per home.
    pub capacity_contribution: f64,
    /// Homeowner savings per year; taken from the yearly blend when unset
    /// in a scenario.
    pub blended_annual_savings: Option<f64>,
    /// kWh shifted per home per year; taken from the yearly blend when
    /// unset in a scenario.
    pub total_energy_shifted: Option<f64>,
}

impl Default for RepParams {
    fn default() -> Self {
        Self {
            rep_homes: 10_000,
            wholesale_peak: 250.0,
            wholesale_off_peak: 30.0,
            ancillary_value: 2.5,
            capacity_contribution: 4.0,
            blended_annual_savings: None,
            total_energy_shifted: None,
        }
    }
}

impl RepParams {
    pub fn inputs(&self) -> RepInputs {
        RepInputs {
            homes: self.rep_homes,
            wholesale_peak_per_kwh: self.wholesale_peak / KWH_PER_MWH,
            wholesale_off_peak_per_kwh: self.wholesale_off_peak / KWH_PER_MWH,
            ancillary_value: self.ancillary_value,
            capacity_contribution_kw: self.capacity_contribution,
        }
    }

    /// Homeowner figures from the request, falling back to `blend` for any
    /// that are unset.
    pub fn homeowner_or(&self, blend: HomeownerAnnual) -> HomeownerAnnual {
        HomeownerAnnual {
            blended_annual_savings: self
                .blended_annual_savings
                .unwrap_or(blend.blended_annual_savings),
            total_energy_shifted: self
                .total_energy_shifted
                .unwrap_or(blend.total_energy_shifted),
        }
    }

    /// Homeowner figures from the request, zero when unset.
    pub fn homeowner(&self) -> HomeownerAnnual {
        self.homeowner_or(HomeownerAnnual {
            blended_annual_savings: 0.0,
            total_energy_shifted: 0.0,
        })
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.inputs().violations();
        if self.blended_annual_savings.is_some_and(|v| !v.is_finite()) {
            errors.push(ValidationError::new("blendedAnnualSavings", "must be finite"));
        }
        if self
            .total_energy_shifted
            .is_some_and(|v| !(v.is_finite() && v >= 0.0))
        {
            errors.push(ValidationError::new(
                "totalEnergyShifted",
                "must be a finite number >= 0",
            ));
        }
        errors
    }
}

/// C&I operator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CiParams {
    /// $M of EBITDA per MW per year.
    #[serde(rename = "ebitdaPerMW")]
    pub ebitda_per_mw: f64,
    /// Years gained by energizing early.
    pub time_savings: f64,
    /// Percent.
    pub discount_rate: f64,
    /// Years.
    pub op_horizon: u32,
}

impl Default for CiParams {
    fn default() -> Self {
        Self {
            ebitda_per_mw: 1.0,
            time_savings: 2.0,
            discount_rate: 10.0,
            op_horizon: 10,
        }
    }
}

impl CiParams {
    pub fn inputs(&self) -> CiInputs {
        CiInputs {
            ebitda_per_mw_musd: self.ebitda_per_mw,
            time_savings_years: self.time_savings,
            discount_rate: self.discount_rate / PERCENT,
            op_horizon_years: self.op_horizon,
        }
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        self.inputs().violations()
    }
}

/// Financed system parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaybackParams {
    pub total_cost: f64,
    /// Percent of `total_cost`.
    #[serde(rename = "federalITC")]
    pub federal_itc: f64,
    pub state_rebates: f64,
    pub utility_rebate: f64,
    /// Taken from the yearly blend when unset in a scenario.
    pub annual_savings: Option<f64>,
}

impl Default for PaybackParams {
    fn default() -> Self {
        Self {
            total_cost: 3500.0,
            federal_itc: 30.0,
            state_rebates: 0.0,
            utility_rebate: 500.0,
            annual_savings: None,
        }
    }
}

impl PaybackParams {
    /// Inputs using `fallback_savings` when `annual_savings` is unset.
    pub fn inputs_or(&self, fallback_savings: f64) -> PaybackInputs {
        PaybackInputs {
            total_cost: self.total_cost,
            federal_itc: self.federal_itc / PERCENT,
            state_rebates: self.state_rebates,
            utility_rebate: self.utility_rebate,
            annual_savings: self.annual_savings.unwrap_or(fallback_savings),
        }
    }

    pub fn inputs(&self) -> PaybackInputs {
        self.inputs_or(0.0)
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        self.inputs().violations()
    }
}

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults matching the dashboard's defaults. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Pricing, HVAC and battery for the single-day run; pricing and
    /// battery also drive the yearly blend.
    #[serde(default)]
    pub homeowner: HomeownerParams,
    #[serde(default)]
    pub year: YearParams,
    #[serde(default)]
    pub rep: RepParams,
    #[serde(default)]
    pub ci: CiParams,
    #[serde(default)]
    pub payback: PaybackParams,
}

/// Prefixes each error's field with its TOML section.
fn in_section(
    section: &str,
    errors: Vec<ValidationError>,
) -> impl Iterator<Item = ValidationError> {
    errors.into_iter().map(move |mut e| {
        e.field = format!("{section}.{}", e.field);
        e
    })
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "rtp_evening_spike", "small_battery"];

    /// Returns the dashboard defaults.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Real-time prices with a cheap night and a sharp evening spike.
    pub fn rtp_evening_spike() -> Self {
        let hourly_prices = (0..24)
            .map(|h| match h {
                0..=5 => 0.06,
                17..=20 => 0.45,
                _ => 0.13,
            })
            .collect();
        Self {
            homeowner: HomeownerParams {
                pricing_model: PricingModel::Rtp,
                hourly_prices,
                peak_start: 17,
                peak_end: 21,
                ..HomeownerParams::default()
            },
            ..Self::default()
        }
    }

    /// A 5 kWh battery with half the power and a two-hour discharge window.
    pub fn small_battery() -> Self {
        Self {
            homeowner: HomeownerParams {
                battery_capacity: 5.0,
                battery_power: 2.5,
                discharge_duration: 2,
                ..HomeownerParams::default()
            },
            payback: PaybackParams {
                total_cost: 2200.0,
                ..PaybackParams::default()
            },
            ..Self::default()
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPreset`] if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "rtp_evening_spike" => Ok(Self::rtp_evening_spike()),
            "small_battery" => Ok(Self::small_battery()),
            _ => Err(Error::UnknownPreset {
                name: name.to_string(),
                available: Self::PRESETS.join(", "),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Toml`] if the TOML is invalid or contains unknown
    /// sections.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// The yearly request this scenario implies.
    pub fn yearly(&self) -> YearlyParams {
        YearlyParams {
            homeowner: self.homeowner.clone(),
            year: self.year,
        }
    }

    /// Validates all sections and returns a list of errors.
    ///
    /// Field names are prefixed with their section, e.g.
    /// `"homeowner.peakStart"`. Returns an empty vector if the scenario is
    /// valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        errors.extend(in_section("homeowner", self.homeowner.validate()));
        let year = self.year.counts().err().into_iter().collect();
        errors.extend(in_section("year", year));
        errors.extend(in_section("rep", self.rep.validate()));
        errors.extend(in_section("ci", self.ci.validate()));
        errors.extend(in_section("payback", self.payback.validate()));
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_valid() {
        assert!(ScenarioConfig::baseline().validate().is_empty());
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name).unwrap();
            let errors = cfg.validate();
            assert!(errors.is_empty(), "preset {name} invalid: {errors:?}");
        }
    }

    #[test]
    fn unknown_preset_lists_available() {
        let err = ScenarioConfig::from_preset("nope").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope"));
        assert!(msg.contains("small_battery"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = ScenarioConfig::from_toml_str(
            r#"
            [homeowner]
            peakRate = 0.35

            [year]
            hotDays = 120
            "#,
        )
        .unwrap();
        assert_eq!(cfg.homeowner.peak_rate, 0.35);
        assert_eq!(cfg.homeowner.off_peak_rate, 0.12);
        assert_eq!(cfg.year.hot_days, 120);
        assert_eq!(cfg.year.mild_days, 180);
        assert_eq!(cfg.rep, RepParams::default());
    }

    #[test]
    fn empty_toml_is_baseline() {
        assert_eq!(
            ScenarioConfig::from_toml_str("").unwrap(),
            ScenarioConfig::baseline()
        );
    }

    #[test]
    fn unknown_section_is_rejected() {
        let result = ScenarioConfig::from_toml_str("[solar]\nkwPeak = 5.0\n");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn json_uses_contract_field_names() {
        let params: HomeownerParams = from_json(
            r#"{"pricingModel": "rtp", "hourlyPrices": [0.1, 0.2],
                "minSoC": 0.2, "maxSoC": 0.8, "hvacLoadShape": 7}"#,
        )
        .unwrap();
        assert_eq!(params.pricing_model, PricingModel::Rtp);
        assert_eq!(params.min_soc, 0.2);
        assert_eq!(params.max_soc, 0.8);
        assert_eq!(params.hvac_load_shape, 7.0);
        assert_eq!(params.battery_capacity, 10.0);

        let ci: CiParams = from_json(r#"{"ebitdaPerMW": 2.5, "timeSavings": 1.5}"#).unwrap();
        assert_eq!(ci.ebitda_per_mw, 2.5);
        assert_eq!(ci.time_savings, 1.5);
        assert!(ci.validate().is_empty());
        let payback: PaybackParams = from_json(r#"{"federalITC": 0}"#).unwrap();
        assert_eq!(payback.federal_itc, 0.0);
    }

    #[test]
    fn fractional_and_whole_float_shapes_are_accepted() {
        for (json, shape) in [
            (r#"{"hvacLoadShape": 5.5}"#, 5.5),
            (r#"{"hvacLoadShape": 5.0}"#, 5.0),
        ] {
            let params: HomeownerParams = from_json(json).unwrap();
            let day = params.resolve().unwrap();
            assert_eq!(day.hvac.shape, shape);
        }
        let params: HomeownerParams = from_json(r#"{"hvacLoadShape": 10.01}"#).unwrap();
        assert!(params.resolve().is_err());
    }

    #[test]
    fn unbounded_ci_delay_is_rejected() {
        let params = CiParams {
            time_savings: 3_000_000_000.0,
            ..CiParams::default()
        };
        let fields: Vec<String> = params.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["timeSavings"]);
    }

    #[test]
    fn yearly_request_is_flat() {
        let params: YearlyParams =
            from_json(r#"{"peakRate": 0.3, "hotDays": 100, "mildDays": 200}"#).unwrap();
        assert_eq!(params.homeowner.peak_rate, 0.3);
        assert_eq!(params.year.hot_days, 100);
        assert_eq!(params.resolve().unwrap().counts.winter_days, 65);
    }

    #[test]
    fn yearly_ignores_hvac_fields() {
        let params = YearlyParams {
            homeowner: HomeownerParams {
                hvac_load_shape: 11.0,
                ..HomeownerParams::default()
            },
            ..YearlyParams::default()
        };
        assert!(params.validate().is_empty());
        assert!(!params.homeowner.validate().is_empty());
    }

    #[test]
    fn validation_collects_every_violation() {
        let params = HomeownerParams {
            peak_start: 20,
            peak_end: 19,
            hvac_load_shape: 0.0,
            battery_efficiency: 1.5,
            ..HomeownerParams::default()
        };
        let fields: Vec<String> = params.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["peakStart", "batteryEfficiency", "hvacLoadShape"]
        );
        assert!(matches!(params.resolve(), Err(Error::InvalidConfig(e)) if e.len() == 3));
    }

    #[test]
    fn scenario_errors_name_their_section() {
        let cfg = ScenarioConfig {
            year: YearParams {
                hot_days: 300,
                mild_days: 100,
            },
            ci: CiParams {
                op_horizon: 0,
                ..CiParams::default()
            },
            ..ScenarioConfig::baseline()
        };
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["year.mildDays", "ci.opHorizon"]);
    }

    #[test]
    fn rep_prices_convert_to_kwh() {
        let inputs = RepParams::default().inputs();
        assert_eq!(inputs.wholesale_peak_per_kwh, 0.25);
        assert_eq!(inputs.wholesale_off_peak_per_kwh, 0.03);
    }

    #[test]
    fn explicit_savings_override_fallback() {
        let params = PaybackParams {
            annual_savings: Some(150.0),
            ..PaybackParams::default()
        };
        assert_eq!(params.inputs_or(279.8).annual_savings, 150.0);
        assert_eq!(PaybackParams::default().inputs_or(279.8).annual_savings, 279.8);
        assert_eq!(PaybackParams::default().inputs().federal_itc, 0.3);
    }

    #[test]
    fn rtp_preset_builds_rtp_pricing() {
        let cfg = ScenarioConfig::rtp_evening_spike();
        match cfg.homeowner.pricing() {
            PricingConfig::RealTimePrice { hourly_prices, .. } => {
                assert_eq!(hourly_prices.len(), 24);
                assert_eq!(hourly_prices[18], 0.45);
            }
            PricingConfig::TimeOfUse(_) => panic!("expected real-time pricing"),
        }
    }
}
