//! CSV export for the hourly traces of a homeowner day.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::profile::HOURS_PER_DAY;
use crate::sim::homeowner::DayResult;

/// Column header for the hourly trace export.
const HEADER: &str = "hour,rate,hvac_usage_kwh,hvac_from_grid_kwh,charge_kwh,discharge_kwh";

/// Exports a day's hourly traces to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(day: &DayResult, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(day, io::BufWriter::new(file))
}

/// Writes a day's hourly traces as CSV to any writer.
///
/// One header row, then one row per hour. Rates carry four decimals and
/// energies three, the same precision as the JSON report.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(day: &DayResult, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for hour in 0..HOURS_PER_DAY {
        wtr.write_record(&[
            hour.to_string(),
            format!("{:.4}", day.rates[hour]),
            format!("{:.3}", day.hvac_usage[hour]),
            format!("{:.3}", day.hvac_from_grid[hour]),
            format!("{:.3}", day.dispatch.charge_plan[hour]),
            format!("{:.3}", day.dispatch.discharge_plan[hour]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
