//! Query errors and warnings.

use dine_model::Field;
use polars::prelude::PolarsError;
use thiserror::Error;

use crate::aggregate::Aggregation;

/// A query that cannot be run as written.
///
/// Raised before any record is scanned. An empty selection is never an
/// error; it produces an empty table.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query has no value columns")]
    NoValueColumns,

    #[error("{agg} needs a numeric field, got '{field}'")]
    NonNumericField { agg: Aggregation, field: Field },

    #[error("sort column '{column}' is not part of the output ({available})")]
    UnknownSortColumn { column: String, available: String },

    #[error("an alias needs exactly one value column, got {count}")]
    AliasWithManyValues { count: usize },

    #[error("output column '{column}' appears more than once")]
    DuplicateColumn { column: String },

    #[error("DataFrame conversion failed: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, QueryError>;

/// Non-fatal conditions reported alongside a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryWarning {
    /// The selection matched no records.
    EmptyResult,
}

impl std::fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryWarning::EmptyResult => f.write_str("no data for this selection"),
        }
    }
}
