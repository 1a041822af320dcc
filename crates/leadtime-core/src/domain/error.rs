//! Error taxonomy for lead-time derivation.

use chrono::NaiveDate;

/// Lead-time domain errors.
#[derive(Debug, thiserror::Error)]
pub enum LeadTimeError {
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("csv error at line {line}: {source}")]
    CsvRecord {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config render error: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for lead-time operations.
pub type Result<T> = std::result::Result<T, LeadTimeError>;
