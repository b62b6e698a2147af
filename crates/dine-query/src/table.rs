//! Tabular query results.

use std::collections::BTreeMap;

use dine_model::Value;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use serde::Serialize;

use crate::error::{QueryWarning, Result};

/// Ordered rows of values under named columns.
///
/// Column names are canonical field names (or query aliases). Display names
/// are applied by the presenting collaborator through
/// [`ResultTable::with_display_names`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Rows must have one value per column.
    pub(crate) fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Vec<Value>> {
        &mut self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|values| &values[idx])
    }

    /// Keeps the named columns in the given order; unknown names are skipped.
    pub fn select_columns(&self, names: &[&str]) -> Self {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        Self {
            columns: indices.iter().map(|idx| self.columns[*idx].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|idx| row[*idx].clone()).collect())
                .collect(),
        }
    }

    pub fn warning(&self) -> Option<QueryWarning> {
        self.is_empty().then_some(QueryWarning::EmptyResult)
    }

    /// Renames columns for presentation. Unmapped columns keep their names.
    pub fn with_display_names(mut self, names: &BTreeMap<&str, &str>) -> Self {
        for column in &mut self.columns {
            if let Some(display) = names.get(column.as_str()) {
                *column = (*display).to_string();
            }
        }
        self
    }

    /// Converts the table into a polars frame, one typed column per column.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<&Value> = self.rows.iter().map(|row| &row[idx]).collect();
                value_series(name, &values).into_column()
            })
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

/// Builds a series with the narrowest type that holds every value.
fn value_series(name: &str, values: &[&Value]) -> Series {
    let all = |pred: &dyn Fn(&Value) -> bool| values.iter().all(|&v| pred(v));
    if all(&|v| matches!(v, Value::Int(_))) {
        let data: Vec<i64> = values.iter().filter_map(|v| v.as_i64()).collect();
        Series::new(name.into(), data)
    } else if all(&|v| matches!(v, Value::Int(_) | Value::Float(_))) {
        let data: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
        Series::new(name.into(), data)
    } else if all(&|v| matches!(v, Value::Bool(_))) {
        let data: Vec<bool> = values
            .iter()
            .map(|v| matches!(v, Value::Bool(true)))
            .collect();
        Series::new(name.into(), data)
    } else {
        let data: Vec<String> = values.iter().map(ToString::to_string).collect();
        Series::new(name.into(), data)
    }
}
