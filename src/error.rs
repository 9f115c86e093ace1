//! Error taxonomy shared by every calculator.

use std::io;

use thiserror::Error;

/// Out-of-range or contradictory input, reported with the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    /// Request field name (e.g., `"hvacLoadShape"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A derived impossibility discovered while computing a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    #[error(
        "charging capacity shortfall: needed {requested_kwh:.3} kWh from the grid, \
         only {delivered_kwh:.3} kWh could be scheduled"
    )]
    CapacityShortfall {
        requested_kwh: f64,
        delivered_kwh: f64,
    },
}

/// Top-level error for the library and the CLI.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Computation(#[from] ComputationError),

    #[error("{}", join_validation(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("unknown preset \"{name}\", available: {available}")]
    UnknownPreset { name: String, available: String },

    #[error("cannot read \"{path}\": {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn join_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
