use chrono::NaiveDate;
use thiserror::Error;

/// Errors reported by the simulator and its request validation.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingField(Vec<&'static str>),

    #[error("Start date {start} must be before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Initial balance must be a finite number no larger than 1e28 in magnitude, got {0}")]
    InvalidBalance(f64),

    #[error("Failed to load rates for index '{index}': {reason}")]
    RateSource { index: String, reason: String },

    #[error("Simulation failed: {0}")]
    Computation(String),
}
