//! Frame cleaning pipeline.
//!
//! Cleaning is a fixed sequence of independent steps, each a pure
//! `&DataFrame -> DataFrame` function:
//!
//! 1. Drop the always-empty legacy column
//! 2. Rename raw columns to canonical names (then require the canonical schema)
//! 3. Remove duplicate rows (cuisine compared by its first token)
//! 4. Remove rows with a missing value in any column
//! 5. Reduce the cuisine list to its first token
//! 6. Remove rows whose cuisine is excluded
//!
//! Every step is idempotent, so cleaning an already clean frame returns it
//! unchanged.

use std::collections::HashSet;
use std::fmt;

use dine_ingest::{cell_text, is_missing};
use polars::prelude::{
    AnyValue, BooleanChunked, Column, DataFrame, NamedFrom, NewChunkedArray, Series,
};
use tracing::debug;

use crate::config::CleaningConfig;
use crate::error::{Result, SchemaError};

/// Pipeline step identifiers, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningStep {
    DropEmptyColumn,
    RenameColumns,
    DropDuplicates,
    DropIncomplete,
    CanonicalizeCuisine,
    ExcludeCuisines,
}

impl CleaningStep {
    pub const ALL: [CleaningStep; 6] = [
        CleaningStep::DropEmptyColumn,
        CleaningStep::RenameColumns,
        CleaningStep::DropDuplicates,
        CleaningStep::DropIncomplete,
        CleaningStep::CanonicalizeCuisine,
        CleaningStep::ExcludeCuisines,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CleaningStep::DropEmptyColumn => "drop_empty_column",
            CleaningStep::RenameColumns => "rename_columns",
            CleaningStep::DropDuplicates => "drop_duplicates",
            CleaningStep::DropIncomplete => "drop_incomplete",
            CleaningStep::CanonicalizeCuisine => "canonicalize_cuisine",
            CleaningStep::ExcludeCuisines => "exclude_cuisines",
        }
    }
}

impl fmt::Display for CleaningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row counts around one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCount {
    pub step: CleaningStep,
    pub rows_before: usize,
    pub rows_after: usize,
}

impl StepCount {
    pub fn removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

/// Per-step row counts of one cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub steps: Vec<StepCount>,
}

impl CleaningReport {
    pub fn input_rows(&self) -> usize {
        self.steps.first().map_or(0, |s| s.rows_before)
    }

    pub fn output_rows(&self) -> usize {
        self.steps.last().map_or(0, |s| s.rows_after)
    }

    pub fn removed_by(&self, step: CleaningStep) -> usize {
        self.steps
            .iter()
            .filter(|s| s.step == step)
            .map(StepCount::removed)
            .sum()
    }
}

/// Applies the cleaning steps of a [`CleaningConfig`].
#[derive(Debug, Clone, Default)]
pub struct RecordCleaner {
    config: CleaningConfig,
}

impl RecordCleaner {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Runs every step in order.
    pub fn clean(&self, df: &DataFrame) -> Result<DataFrame> {
        self.clean_with_report(df).map(|(frame, _)| frame)
    }

    /// Runs every step in order and records row counts per step.
    pub fn clean_with_report(&self, df: &DataFrame) -> Result<(DataFrame, CleaningReport)> {
        let mut report = CleaningReport::default();
        let mut frame = df.clone();
        for step in CleaningStep::ALL {
            let rows_before = frame.height();
            frame = self.apply(step, &frame)?;
            let rows_after = frame.height();
            debug!(step = %step, rows_before, rows_after, "Applied cleaning step");
            report.steps.push(StepCount {
                step,
                rows_before,
                rows_after,
            });
        }
        Ok((frame, report))
    }

    /// Applies a single step.
    pub fn apply(&self, step: CleaningStep, df: &DataFrame) -> Result<DataFrame> {
        match step {
            CleaningStep::DropEmptyColumn => drop_empty_column(df, &self.config.dropped_column),
            CleaningStep::RenameColumns => {
                let renamed = rename_columns(df, &self.config)?;
                require_columns(&renamed, &self.config.required_columns, step)?;
                Ok(renamed)
            }
            CleaningStep::DropDuplicates => drop_duplicate_rows(
                df,
                &self.config.cuisine_column,
                self.config.cuisine_separator,
            ),
            CleaningStep::DropIncomplete => drop_incomplete_rows(df),
            CleaningStep::CanonicalizeCuisine => canonicalize_cuisine(
                df,
                &self.config.cuisine_column,
                self.config.cuisine_separator,
            ),
            CleaningStep::ExcludeCuisines => exclude_cuisines(df, &self.config),
        }
    }
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

/// Removes the legacy column; a frame without it is returned as is.
pub fn drop_empty_column(df: &DataFrame, name: &str) -> Result<DataFrame> {
    let mut out = df.clone();
    if has_column(&out, name) {
        out.drop_in_place(name)?;
    }
    Ok(out)
}

/// Renames raw columns to canonical names. Unmapped columns keep their names.
pub fn rename_columns(df: &DataFrame, config: &CleaningConfig) -> Result<DataFrame> {
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .map(|col| match config.renames.get(col.name().as_str()) {
            Some(canonical) => col.clone().with_name(canonical.as_str().into()),
            None => col.clone(),
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Fails with a schema error naming the first absent column.
pub fn require_columns(df: &DataFrame, required: &[String], step: CleaningStep) -> Result<()> {
    if let Some(missing) = required.iter().find(|name| !has_column(df, name)) {
        return Err(SchemaError::MissingColumn {
            column: missing.clone(),
            step: step.as_str(),
        }
        .into());
    }
    Ok(())
}

/// Builds a match key for a row. Nulls are distinct from empty text.
///
/// The cuisine column contributes its first token, so rows that only become
/// identical once the cuisine list is reduced are already duplicates here.
fn row_key(columns: &[Column], row: usize, cuisine: Option<(usize, char)>) -> Result<String> {
    let mut key = String::new();
    for (pos, column) in columns.iter().enumerate() {
        if pos > 0 {
            key.push('\u{1f}');
        }
        let value = column.get(row)?;
        match cuisine {
            Some((idx, separator)) if idx == pos => {
                let text = cell_text(&value);
                match text.as_deref().and_then(|raw| first_token(raw, separator)) {
                    Some(token) => key.push_str(token),
                    None => key.push('\u{0}'),
                }
            }
            _ => match value {
                AnyValue::Null => key.push('\u{0}'),
                value => key.push_str(&value.to_string()),
            },
        }
    }
    Ok(key)
}

/// Keeps the first occurrence of every distinct row.
pub fn drop_duplicate_rows(
    df: &DataFrame,
    cuisine_column: &str,
    separator: char,
) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let columns = df.get_columns();
    let cuisine = columns
        .iter()
        .position(|col| col.name().as_str() == cuisine_column)
        .map(|idx| (idx, separator));
    let mut seen = HashSet::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        keep.push(seen.insert(row_key(columns, idx, cuisine)?));
    }
    filter_rows(df, &keep)
}

/// Removes rows with a null or blank value in any column.
pub fn drop_incomplete_rows(df: &DataFrame) -> Result<DataFrame> {
    let mut keep = vec![true; df.height()];
    for column in df.get_columns() {
        for (idx, flag) in keep.iter_mut().enumerate() {
            if *flag && is_missing(&column.get(idx)?) {
                *flag = false;
            }
        }
    }
    filter_rows(df, &keep)
}

/// First token of a separated list, trimmed; `None` when that token is blank.
pub fn first_token(raw: &str, separator: char) -> Option<&str> {
    let token = raw.split(separator).next().unwrap_or_default().trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Replaces the cuisine list with its first token.
pub fn canonicalize_cuisine(df: &DataFrame, column: &str, separator: char) -> Result<DataFrame> {
    let source = df.column(column).map_err(|_| SchemaError::MissingColumn {
        column: column.to_string(),
        step: CleaningStep::CanonicalizeCuisine.as_str(),
    })?;
    let mut values: Vec<Option<String>> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let text = cell_text(&source.get(idx)?);
        values.push(
            text.as_deref()
                .and_then(|raw| first_token(raw, separator))
                .map(str::to_string),
        );
    }
    let mut out = df.clone();
    out.with_column(Series::new(column.into(), values))?;
    Ok(out)
}

/// Removes excluded cuisines, and rows left without a cuisine token.
pub fn exclude_cuisines(df: &DataFrame, config: &CleaningConfig) -> Result<DataFrame> {
    let column = df
        .column(&config.cuisine_column)
        .map_err(|_| SchemaError::MissingColumn {
            column: config.cuisine_column.clone(),
            step: CleaningStep::ExcludeCuisines.as_str(),
        })?;
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let keep_row = match cell_text(&column.get(idx)?) {
            Some(cuisine) => !config.is_excluded_cuisine(&cuisine),
            None => false,
        };
        keep.push(keep_row);
    }
    filter_rows(df, &keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dine_ingest::frame_from_rows;

    fn small_config() -> CleaningConfig {
        CleaningConfig::default().with_required_columns(["restaurant_id", "cuisines"])
    }

    #[test]
    fn first_token_takes_text_before_separator() {
        assert_eq!(first_token("Italian, Pizza", ','), Some("Italian"));
        assert_eq!(first_token("  Italian  ", ','), Some("Italian"));
        assert_eq!(first_token(", Pizza", ','), None);
        assert_eq!(first_token("", ','), None);
    }

    #[test]
    fn drop_empty_column_is_noop_when_absent() {
        let df = frame_from_rows(&["A"], &[vec![Some("1")]]).unwrap();
        let out = drop_empty_column(&df, "Switch to order menu").unwrap();
        assert_eq!(out.width(), 1);
    }

    #[test]
    fn rename_then_require() {
        let df = frame_from_rows(&["Restaurant ID", "Cuisines"], &[vec![Some("1"), Some("x")]])
            .unwrap();
        let cleaner = RecordCleaner::new(small_config());
        let renamed = cleaner.apply(CleaningStep::RenameColumns, &df).unwrap();
        assert!(renamed.column("restaurant_id").is_ok());
        assert!(renamed.column("cuisines").is_ok());

        let missing = frame_from_rows(&["Restaurant ID"], &[vec![Some("1")]]).unwrap();
        let err = cleaner
            .apply(CleaningStep::RenameColumns, &missing)
            .unwrap_err();
        assert!(err.to_string().contains("missing column 'cuisines'"));
    }

    #[test]
    fn duplicates_keep_first_and_null_differs_from_blank() {
        let df = frame_from_rows(
            &["a", "b"],
            &[
                vec![Some("1"), Some("x")],
                vec![Some("1"), Some("x")],
                vec![Some("1"), None],
                vec![Some("1"), Some("")],
            ],
        )
        .unwrap();
        let out = drop_duplicate_rows(&df, "cuisines", ',').unwrap();
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn duplicates_compare_cuisine_by_first_token() {
        let df = frame_from_rows(
            &["a", "cuisines"],
            &[
                vec![Some("1"), Some("Italian, Pizza")],
                vec![Some("1"), Some("Italian")],
                vec![Some("1"), Some("Pizza, Italian")],
            ],
        )
        .unwrap();
        let out = drop_duplicate_rows(&df, "cuisines", ',').unwrap();
        assert_eq!(out.height(), 2);
        let kept = out.column("cuisines").unwrap().str().unwrap().get(0);
        assert_eq!(kept, Some("Italian, Pizza"));
    }

    #[test]
    fn incomplete_rows_are_removed() {
        let df = frame_from_rows(
            &["a", "b"],
            &[
                vec![Some("1"), Some("x")],
                vec![Some("2"), None],
                vec![Some("3"), Some("  ")],
            ],
        )
        .unwrap();
        let out = drop_incomplete_rows(&df).unwrap();
        assert_eq!(out.height(), 1);
    }

    #[test]
    fn report_tracks_each_step() {
        let df = frame_from_rows(
            &["Restaurant ID", "Cuisines", "Switch to order menu"],
            &[
                vec![Some("1"), Some("Italian, Pizza"), Some("0")],
                vec![Some("1"), Some("Italian, Pizza"), Some("0")],
                vec![Some("2"), None, Some("0")],
                vec![Some("3"), Some("Drinks Only"), Some("0")],
                vec![Some("4"), Some("Mineira, Brazilian"), Some("0")],
            ],
        )
        .unwrap();
        let cleaner = RecordCleaner::new(small_config());
        let (out, report) = cleaner.clean_with_report(&df).unwrap();

        assert_eq!(out.height(), 1);
        assert_eq!(out.width(), 2);
        assert_eq!(report.input_rows(), 5);
        assert_eq!(report.output_rows(), 1);
        assert_eq!(report.removed_by(CleaningStep::DropDuplicates), 1);
        assert_eq!(report.removed_by(CleaningStep::DropIncomplete), 1);
        assert_eq!(report.removed_by(CleaningStep::ExcludeCuisines), 2);
        let cuisine = out.column("cuisines").unwrap().str().unwrap().get(0);
        assert_eq!(cuisine, Some("Italian"));
    }
}
