use crate::transform::ProjectionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unknown text encoding: '{0}'")]
    Encoding(String),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Column '{column}' not found in table")]
    InvalidColumn { column: String },

    #[error("Unknown mode: '{0}' (expected force_31n, auto or fixed)")]
    UnknownMode(String),

    #[error("fixed_zone must be provided when mode='fixed'")]
    MissingFixedZone,

    #[error("fixed_zone must be one of 29, 30, or 31 (got {0})")]
    InvalidFixedZone(i64),

    #[error("No valid rows with latitudes/longitudes in range")]
    NoValidRows,

    #[error("Coordinate transformation error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Coordinate transformation failed for all rows: {source}")]
    AllRowsFailed { source: ProjectionError },
}
