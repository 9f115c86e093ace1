//! Home battery value simulator for HVAC load under time-varying prices.
//!
//! Synthesizes a day of HVAC consumption, schedules a battery to serve the
//! most expensive hours from energy bought in the cheapest ones, and turns
//! the resulting savings into annual figures for the homeowner, the retail
//! provider, C&I operators and a financed-system payback.

pub mod config;
pub mod devices;
pub mod error;
/// Hourly trace export.
pub mod io;
pub mod profile;
pub mod report;
pub mod runner;
/// Dispatch, single-day and yearly simulation.
pub mod sim;
pub mod tariff;
pub mod value;

pub use error::{Error, Result};
