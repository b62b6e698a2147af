//! Cleaning policy.

use std::collections::BTreeMap;

use dine_model::schema::{
    CANONICAL_COLUMNS, CUISINES_COLUMN, EMPTY_LEGACY_COLUMN, RAW_TO_CANONICAL,
};

/// Constants that drive the cleaning pipeline.
///
/// [`CleaningConfig::default`] is the fixed policy for the restaurant
/// snapshot; tests may narrow it (fewer required columns, other exclusions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningConfig {
    /// Always-empty legacy column removed by the first step.
    pub dropped_column: String,
    /// Case-sensitive raw -> canonical column renames.
    pub renames: BTreeMap<String, String>,
    /// Columns that must exist once renaming is done.
    pub required_columns: Vec<String>,
    /// Multi-valued cuisine column, by canonical name.
    pub cuisine_column: String,
    /// Separator of the raw cuisine list.
    pub cuisine_separator: char,
    /// Cuisine tokens removed from every result.
    pub excluded_cuisines: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            dropped_column: EMPTY_LEGACY_COLUMN.to_string(),
            renames: RAW_TO_CANONICAL
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                .collect(),
            required_columns: CANONICAL_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            cuisine_column: CUISINES_COLUMN.to_string(),
            cuisine_separator: ',',
            excluded_cuisines: vec!["Mineira".to_string(), "Drinks Only".to_string()],
        }
    }
}

impl CleaningConfig {
    pub fn with_required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_excluded_cuisine(&self, cuisine: &str) -> bool {
        self.excluded_cuisines.iter().any(|excluded| excluded == cuisine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let config = CleaningConfig::default();
        assert_eq!(config.dropped_column, "Switch to order menu");
        assert_eq!(
            config.renames.get("Aggregate rating").map(String::as_str),
            Some("aggregate_rating")
        );
        assert!(config.is_excluded_cuisine("Mineira"));
        assert!(config.is_excluded_cuisine("Drinks Only"));
        assert!(!config.is_excluded_cuisine("drinks only"));
        assert!(config.required_columns.contains(&"cuisines".to_string()));
    }
}
