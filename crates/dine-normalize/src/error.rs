//! Error types for cleaning and record building.

use polars::prelude::PolarsError;
use thiserror::Error;

/// The frame does not have the shape the pipeline needs.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("missing column '{column}' required by {step}")]
    MissingColumn { column: String, step: &'static str },

    #[error("missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("invalid value '{value}' in column '{column}' at row {row}: expected {expected}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    #[error("duplicate restaurant id {id} at row {row}")]
    DuplicateId { id: i64, row: usize },
}

/// A coded value has no entry in the lookup tables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnknownCodeError {
    #[error("unknown country code {code}")]
    Country { code: i64 },

    #[error("unknown rating color '{code}'")]
    RatingColor { code: String },
}

/// Errors that abort a load. No partial record set is ever returned.
#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("restaurant {restaurant_id} (row {row}): {source}")]
    UnknownCode {
        restaurant_id: i64,
        row: usize,
        #[source]
        source: UnknownCodeError,
    },

    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, NormalizationError>;
