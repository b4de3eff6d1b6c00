//! Error types for ICU table ingestion.

use std::path::PathBuf;

use icu_model::ModelError;
use thiserror::Error;

/// Errors that can occur while loading or adapting source tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Table file not found.
    #[error("table file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open a table file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to read a Parquet file with Polars.
    #[error("failed to read Parquet {path}: {message}")]
    ParquetRead { path: PathBuf, message: String },

    // === Schema Errors ===
    /// A required column is absent from a source table.
    #[error("table '{table}' is missing required column '{column}'")]
    Schema { table: &'static str, column: String },

    /// A non-empty cell could not be parsed as the column's type.
    #[error("invalid value '{value}' in {table}.{column} at row {row}")]
    InvalidValue {
        table: &'static str,
        column: String,
        row: usize,
        value: String,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::Schema {
            table: "adt",
            column: "in_dttm".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "table 'adt' is missing required column 'in_dttm'"
        );

        let err = IngestError::InvalidValue {
            table: "vitals",
            column: "vital_value".to_string(),
            row: 3,
            value: "tall".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'tall' in vitals.vital_value at row 3"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
