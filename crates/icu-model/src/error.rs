use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid site configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("{field} must be an hour between 0 and 23, got {value}")]
    InvalidHour { field: &'static str, value: u32 },
    #[error("invalid hospitalization id: {0:?}")]
    InvalidHospitalizationId(String),
    #[error("invalid subject id: {0:?}")]
    InvalidSubjectId(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
