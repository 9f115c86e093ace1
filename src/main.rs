//! CLI entry point: argument parsing, logging setup and report output.

mod cli;

use std::fmt::Display;
use std::path::Path;
use std::process;

use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hvac_battery_value::Result;
use hvac_battery_value::io::export::export_csv;
use hvac_battery_value::report::{CiReport, DayReport, PaybackReport, RepReport, YearlyReport};
use hvac_battery_value::runner::{
    run_ci, run_homeowner, run_payback, run_rep, run_scenario, run_yearly,
};
use hvac_battery_value::sim::homeowner::DayResult;
use hvac_battery_value::sim::yearly::DayType;

use cli::{Cli, Command, Format, day_type_path};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Homeowner(args) => {
            let params = args.input.load(|s| s.homeowner)?;
            let day = run_homeowner(&params)?;
            if let Some(path) = &args.hourly_out {
                write_hourly(&day, path)?;
            }
            render(cli.format, Some("Homeowner Day"), &DayReport::from(&day))
        }
        Command::Yearly(args) => {
            let params = args.input.load(|s| s.yearly())?;
            let year = run_yearly(&params)?;
            if let Some(path) = &args.hourly_out {
                for day_type in DayType::ALL {
                    write_hourly(year.day(day_type), &day_type_path(path, day_type))?;
                }
            }
            render(cli.format, Some("Homeowner Year"), &YearlyReport::from(&year))
        }
        Command::Rep(input) => {
            let value = run_rep(&input.load(|s| s.rep)?)?;
            render(cli.format, Some("Retail Provider"), &RepReport::from(&value))
        }
        Command::Ci(input) => {
            let cases = run_ci(&input.load(|s| s.ci)?)?;
            render(cli.format, Some("C&I Operator"), &CiReport::from(cases.as_slice()))
        }
        Command::Payback(input) => {
            let result = run_payback(&input.load(|s| s.payback)?)?;
            render(cli.format, Some("Payback"), &PaybackReport::from(&result))
        }
        Command::Scenario(args) => {
            let config = args.input.load(|s| s)?;
            let scenario = run_scenario(&config)?;
            if let Some(path) = &args.hourly_out {
                write_hourly(&scenario.day, path)?;
            }
            render(cli.format, None, &scenario.report())
        }
    }
}

fn write_hourly(day: &DayResult, path: &Path) -> Result<()> {
    export_csv(day, path)?;
    info!(path = %path.display(), "wrote hourly traces");
    Ok(())
}

fn render<R: Serialize + Display>(
    format: Format,
    title: Option<&str>,
    report: &R,
) -> Result<String> {
    Ok(match (format, title) {
        (Format::Json, _) => serde_json::to_string_pretty(report)?,
        (Format::Text, Some(title)) => format!("--- {title} ---\n{report}"),
        (Format::Text, None) => report.to_string(),
    })
}
