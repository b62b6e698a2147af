//! Canonical restaurant records.
//!
//! A [`RestaurantRecord`] is produced once by the cleaning pipeline and never
//! mutated afterwards. Records are shared through a [`RecordSet`], which is a
//! cheap-to-clone, read-only snapshot that any number of queries may scan
//! concurrently.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Cost bucket derived from the raw `Price range` integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Cheap,
    Normal,
    Expensive,
    Gourmet,
}

impl PriceTier {
    /// Maps a raw price range to its tier.
    ///
    /// The mapping is total: 1, 2 and 3 have dedicated tiers and every other
    /// value (4 and above, but also anything out of range) is `Gourmet`.
    pub fn from_range(range: i64) -> Self {
        match range {
            1 => Self::Cheap,
            2 => Self::Normal,
            3 => Self::Expensive,
            _ => Self::Gourmet,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cheap => "cheap",
            Self::Normal => "normal",
            Self::Expensive => "expensive",
            Self::Gourmet => "gourmet",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned restaurant listing with every coded value resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub id: i64,
    pub name: String,
    pub country_code: i64,
    /// Country label resolved from `country_code`.
    pub country: String,
    pub city: String,
    pub address: String,
    pub locality: String,
    pub locality_verbose: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Primary cuisine: first token of the raw comma-separated list.
    pub cuisine: String,
    pub average_cost_for_two: f64,
    pub currency: String,
    pub has_table_booking: bool,
    pub has_online_delivery: bool,
    pub is_delivering_now: bool,
    pub price_tier: PriceTier,
    pub rating: f64,
    /// Color label resolved from the raw hex code.
    pub rating_color: String,
    pub rating_text: String,
    pub votes: u64,
}

/// Immutable, shareable collection of canonical records.
///
/// Cloning a `RecordSet` only bumps a reference count; the records themselves
/// are never copied or modified. Filtering produces views over the slice, not
/// new sets.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Arc<[RestaurantRecord]>,
}

impl RecordSet {
    pub fn new(records: Vec<RestaurantRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by identifier.
    pub fn get(&self, id: i64) -> Option<&RestaurantRecord> {
        self.records.iter().find(|record| record.id == id)
    }
}

impl Deref for RecordSet {
    type Target = [RestaurantRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl From<Vec<RestaurantRecord>> for RecordSet {
    fn from(records: Vec<RestaurantRecord>) -> Self {
        Self::new(records)
    }
}
