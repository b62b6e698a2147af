//! Normalization of raw restaurant snapshots into canonical records.
//!
//! The raw frame goes through the fixed cleaning pipeline of
//! [`RecordCleaner`], then every row is typed and its coded values resolved
//! by [`CodeResolver`]. Any failure aborts the whole load.
//!
//! # Example
//!
//! ```ignore
//! use dine_ingest::read_snapshot;
//! use dine_normalize::{CodeResolver, RecordCleaner, normalize};
//!
//! let raw = read_snapshot(path)?;
//! let normalized = normalize(&raw, &RecordCleaner::default(), &CodeResolver::default())?;
//! println!("{} restaurants", normalized.records.len());
//! ```

mod cleaner;
mod config;
mod error;
mod records;
mod resolver;

use dine_model::RecordSet;
use polars::prelude::DataFrame;
use tracing::info;

pub use cleaner::{
    CleaningReport, CleaningStep, RecordCleaner, StepCount, canonicalize_cuisine,
    drop_duplicate_rows, drop_empty_column, drop_incomplete_rows, exclude_cuisines, first_token,
    rename_columns, require_columns,
};
pub use config::CleaningConfig;
pub use error::{NormalizationError, Result, SchemaError, UnknownCodeError};
pub use records::build_records;
pub use resolver::CodeResolver;

/// Outcome of a successful load.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: RecordSet,
    pub report: CleaningReport,
}

/// Cleans a raw frame and builds the canonical record set.
pub fn normalize(
    raw: &DataFrame,
    cleaner: &RecordCleaner,
    resolver: &CodeResolver,
) -> Result<Normalized> {
    let (cleaned, report) = cleaner.clean_with_report(raw)?;
    let records = build_records(&cleaned, resolver)?;
    info!(
        raw_rows = report.input_rows(),
        records = records.len(),
        "Normalized snapshot"
    );
    Ok(Normalized { records, report })
}
