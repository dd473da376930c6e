//! Error types for transform operations.

use thiserror::Error;
use tollgrid_model::Key;

/// Errors raised by a single transform call.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column the operation reads is absent.
    #[error("required column '{column}' not found")]
    MissingColumn { column: String },

    /// The operation aggregates over all rows and there are none to use.
    #[error("{operation} needs at least one row with a value")]
    EmptyInput { operation: &'static str },

    /// A cell could not be read as the expected type.
    #[error("row {row}: cannot parse '{value}' in column '{column}' as {expected}")]
    ParseFailure {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    /// The reference id has no rows (or only null distances).
    #[error("reference id {reference} has no distance rows")]
    UndefinedReference { reference: Key },

    /// Two rows map to the same matrix cell.
    #[error("duplicate entry for row label {row} and column label {column}")]
    DuplicateKey { row: Key, column: Key },

    /// A pair is listed in both directions with different distances.
    #[error("distance {from} -> {to} is {forward} but {to} -> {from} is {reverse}")]
    ConflictingDistance {
        from: Key,
        to: Key,
        forward: f64,
        reverse: f64,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
