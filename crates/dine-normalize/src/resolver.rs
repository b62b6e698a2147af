//! Code-to-label resolution.

use dine_model::{LookupTables, PriceTier};

use crate::error::UnknownCodeError;

/// Resolves raw coded values against injected lookup tables.
///
/// Country and rating-color lookups are closed: a code missing from the
/// tables is an error, never a fallback label. Price tiers are total.
#[derive(Debug, Clone, Default)]
pub struct CodeResolver {
    tables: LookupTables,
}

impl CodeResolver {
    pub fn new(tables: LookupTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub fn resolve_country(&self, code: i64) -> Result<&str, UnknownCodeError> {
        self.tables
            .countries
            .get(&code)
            .map(String::as_str)
            .ok_or(UnknownCodeError::Country { code })
    }

    /// Exact match on the hex code after trimming; no case folding.
    pub fn resolve_rating_color(&self, hex: &str) -> Result<&str, UnknownCodeError> {
        let key = hex.trim();
        self.tables
            .rating_colors
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| UnknownCodeError::RatingColor {
                code: key.to_string(),
            })
    }

    pub fn resolve_price_tier(&self, range: i64) -> PriceTier {
        PriceTier::from_range(range)
    }
}
