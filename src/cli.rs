//! Command-line arguments.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;

use hvac_battery_value::config::{ScenarioConfig, from_json};
use hvac_battery_value::sim::yearly::DayType;
use hvac_battery_value::{Error, Result};

#[derive(Parser)]
#[command(name = "hvac-battery-value")]
#[command(version, about = "Home battery value for HVAC load under time-varying prices")]
#[command(
    long_about = "Simulates a home battery serving HVAC load and reports the value for the \
    homeowner, the retail provider, C&I operators and a financed system.\n\
    \nInputs come from a JSON request (--request), a TOML scenario (--scenario) or a \
    built-in preset (--preset). Without any of them the baseline preset is used.\n\
    \nExamples:\n  \
    hvac-battery-value homeowner\n  \
    hvac-battery-value yearly --preset small_battery --format json\n  \
    hvac-battery-value scenario --scenario my_home.toml --hourly-out day.csv"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Subcommand)]
pub enum Command {
    /// Savings for one homeowner day
    Homeowner(DayArgs),

    /// Annual savings blended from hot, mild and winter days
    Yearly(DayArgs),

    /// Retail provider value for a fleet of homes
    Rep(InputArgs),

    /// Annualized NPV advantage for 10, 20 and 30 MW C&I projects
    Ci(InputArgs),

    /// Simple payback of the battery system
    Payback(InputArgs),

    /// Every stakeholder, chained from one yearly simulation
    Scenario(DayArgs),
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Args)]
pub struct InputArgs {
    /// TOML scenario file
    #[arg(long, conflicts_with_all = ["preset", "request"])]
    pub scenario: Option<PathBuf>,

    /// Built-in preset (baseline, rtp_evening_spike, small_battery)
    #[arg(long, conflicts_with = "request")]
    pub preset: Option<String>,

    /// JSON request file using the dashboard field names
    #[arg(long)]
    pub request: Option<PathBuf>,
}

#[derive(Args)]
pub struct DayArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write the hourly traces to CSV. For yearly runs one file per day
    /// type is written, named `<stem>_<day type>.csv`.
    #[arg(long)]
    pub hourly_out: Option<PathBuf>,
}

impl InputArgs {
    /// Loads the scenario named by `--scenario` or `--preset`, defaulting to
    /// the baseline.
    pub fn scenario_config(&self) -> Result<ScenarioConfig> {
        match (&self.scenario, &self.preset) {
            (Some(path), _) => ScenarioConfig::from_toml_file(path),
            (None, Some(name)) => ScenarioConfig::from_preset(name),
            (None, None) => Ok(ScenarioConfig::baseline()),
        }
    }

    /// Parameters from `--request` if given, otherwise `section` of the
    /// scenario.
    pub fn load<T: DeserializeOwned>(
        &self,
        section: impl FnOnce(ScenarioConfig) -> T,
    ) -> Result<T> {
        match &self.request {
            Some(path) => from_json(&read(path)?),
            None => Ok(section(self.scenario_config()?)),
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })
}

/// `out/day.csv` becomes `out/day_hot.csv` for the hot day.
pub fn day_type_path(path: &Path, day_type: DayType) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}_{day_type}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{day_type}"),
    };
    path.with_file_name(file_name)
}
