//! Error types for the metrics engine.

use chrono::NaiveDate;
use icu_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The reporting period ends before it starts.
    #[error("reporting period start {start} is after end {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
