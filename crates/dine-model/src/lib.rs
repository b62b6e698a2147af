//! Data model for the restaurant listing engine.
//!
//! - [`RestaurantRecord`] / [`RecordSet`]: canonical, immutable records
//! - [`Field`] / [`Value`]: addressable attributes and totally ordered cells
//! - [`LookupTables`]: injected code-to-label tables
//! - [`schema`]: raw and canonical column names

pub mod error;
pub mod field;
pub mod lookup;
pub mod record;
pub mod schema;

pub use error::{LookupError, Result};
pub use field::{Field, Value};
pub use lookup::LookupTables;
pub use record::{PriceTier, RecordSet, RestaurantRecord};
