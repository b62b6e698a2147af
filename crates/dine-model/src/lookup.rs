//! Fixed code-to-label tables.
//!
//! The tables are plain data handed to the resolver at construction time, so
//! tests and alternate datasets can supply their own without touching any
//! global state. [`LookupTables::default`] holds the tables for the standard
//! restaurant snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LookupError, Result};

/// Country codes and rating-color hex codes with their labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTables {
    /// Raw `Country Code` -> country label.
    pub countries: BTreeMap<i64, String>,
    /// Raw `Rating color` hex string -> color label.
    pub rating_colors: BTreeMap<String, String>,
}

impl Default for LookupTables {
    fn default() -> Self {
        let countries = [
            (1, "India"),
            (14, "Australia"),
            (30, "Brazil"),
            (37, "Canada"),
            (94, "Indonesia"),
            (148, "New Zealand"),
            (162, "Philippines"),
            (166, "Qatar"),
            (184, "Singapore"),
            (189, "South Africa"),
            (191, "Sri Lanka"),
            (208, "Turkey"),
            (214, "United Arab Emirates"),
            (215, "England"),
            (216, "United States of America"),
        ]
        .into_iter()
        .map(|(code, label)| (code, label.to_string()))
        .collect();

        let rating_colors = [
            ("3F7E00", "darkgreen"),
            ("5BA829", "green"),
            ("9ACD32", "lightgreen"),
            ("CDD614", "orange"),
            ("FFBA00", "red"),
            ("CBCBC8", "darkred"),
            ("FF7800", "darkred"),
        ]
        .into_iter()
        .map(|(hex, label)| (hex.to_string(), label.to_string()))
        .collect();

        Self {
            countries,
            rating_colors,
        }
    }
}

impl LookupTables {
    /// Parses tables from JSON and validates them.
    ///
    /// Country codes are JSON object keys, so they are written as strings
    /// (`{"countries": {"30": "Brazil"}, "rating_colors": {...}}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tables: Self = serde_json::from_str(json).map_err(|source| LookupError::Parse {
            path: None,
            source,
        })?;
        tables.validate()?;
        Ok(tables)
    }

    /// Loads tables from a JSON file.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| LookupError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tables: Self = serde_json::from_str(&text).map_err(|source| LookupError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        tables.validate()?;
        Ok(tables)
    }

    /// Rejects tables with blank labels; an empty label would pass as resolved.
    pub fn validate(&self) -> Result<()> {
        if let Some((code, _)) = self
            .countries
            .iter()
            .find(|(_, label)| label.trim().is_empty())
        {
            return Err(LookupError::EmptyLabel {
                table: "countries",
                code: code.to_string(),
            });
        }
        if let Some((code, _)) = self
            .rating_colors
            .iter()
            .find(|(_, label)| label.trim().is_empty())
        {
            return Err(LookupError::EmptyLabel {
                table: "rating_colors",
                code: code.clone(),
            });
        }
        Ok(())
    }
}

/// Helper for error messages that may or may not have a path.
pub(crate) fn describe_path(path: Option<&PathBuf>) -> String {
    path.map_or_else(|| "<inline>".to_string(), |p| p.display().to_string())
}
