//! Queries over canonical restaurant records.
//!
//! - [`RecordFilter`] / [`FilterComposer`]: optional criteria combined by AND
//! - [`aggregate`]: grouped count, sum, mean, distinct, max and per-record ratio
//! - [`best_per_group`] / [`best_overall`]: whole-record ranking
//! - [`views`]: the named dashboard queries
//!
//! Queries never mutate the record set and only read from it, so any number
//! of them can run over clones of the same `RecordSet`.

mod aggregate;
mod error;
mod filter;
mod ranked;
mod table;
pub mod views;

pub use aggregate::{AggregateQuery, Aggregation, SortDirection, SortKey, aggregate, round2};
pub use error::{QueryError, QueryWarning, Result};
pub use filter::{FilterComposer, Predicate, RatingRange, RecordFilter, select};
pub use ranked::{
    RANK_COLUMN, best_first, best_overall, best_overall_records, best_per_group,
    best_per_group_records,
};
pub use table::ResultTable;
