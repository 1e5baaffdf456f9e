//! Error types for the forecast-explorer library.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while loading, decomposing, forecasting or evaluating.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// The uploaded bytes could not be read as CSV.
    #[error("could not read CSV input: {0}")]
    FileRead(String),

    /// A selected column is not part of the CSV header.
    #[error("column '{0}' not found in CSV header")]
    ColumnNotFound(String),

    /// A date cell did not match the DD-MM-YYYY format.
    #[error("row {row}: '{value}' is not a valid DD-MM-YYYY date")]
    DateFormat { row: usize, value: String },

    /// A value cell could not be parsed as a number.
    #[error("row {row}: '{value}' is not a number")]
    ValueParse { row: usize, value: String },

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Multiplicative decomposition hit a zero or negative observation.
    #[error("multiplicative decomposition requires strictly positive values")]
    NonPositiveValues,

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },
}
