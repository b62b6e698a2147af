//! Grouped aggregation.
//!
//! Groups keep the order in which their first member appears in the filtered
//! input; sorting is stable, so ties keep that order too. Two runs over the
//! same records always produce the same table.

use std::collections::{HashMap, HashSet};
use std::fmt;

use dine_model::{Field, RestaurantRecord, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QueryError, Result};
use crate::filter::{Predicate, select};
use crate::table::ResultTable;

/// How value columns are reduced within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Rows in the group.
    Count,
    Sum,
    /// Arithmetic mean, rounded to 2 decimals.
    Mean,
    /// Distinct values.
    NUnique,
    /// Maximum of each value column, taken independently.
    Max,
    /// Sum of the value over the group's row count, rounded to 2 decimals.
    PerRecord,
}

impl Aggregation {
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::Count => "count",
            Aggregation::Sum => "sum",
            Aggregation::Mean => "mean",
            Aggregation::NUnique => "nunique",
            Aggregation::Max => "max",
            Aggregation::PerRecord => "per_record",
        }
    }

    fn is_rounded(self) -> bool {
        matches!(self, Aggregation::Mean | Aggregation::PerRecord)
    }

    fn needs_numeric(self) -> bool {
        matches!(
            self,
            Aggregation::Sum | Aggregation::Mean | Aggregation::PerRecord
        )
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One key of a multi-key sort, addressed by output column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A grouped aggregation over record fields.
///
/// Output columns are the group keys followed by the value columns, named by
/// canonical field name. A single value column may be renamed with
/// [`AggregateQuery::alias`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQuery {
    pub group_by: Vec<Field>,
    pub values: Vec<Field>,
    pub agg: Aggregation,
    pub sort_by: Vec<SortKey>,
    pub limit: Option<usize>,
    pub alias: Option<String>,
}

impl AggregateQuery {
    pub fn new(agg: Aggregation) -> Self {
        Self {
            group_by: Vec::new(),
            values: Vec::new(),
            agg,
            sort_by: Vec::new(),
            limit: None,
            alias: None,
        }
    }

    pub fn group_by(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.group_by = fields.into_iter().collect();
        self
    }

    pub fn value(mut self, field: Field) -> Self {
        self.values.push(field);
        self
    }

    pub fn values(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.values.extend(fields);
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_by.push(key);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(name.into());
        self
    }

    /// Output column names, in order.
    pub fn output_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self
            .group_by
            .iter()
            .map(|field| field.name().to_string())
            .collect();
        match (&self.alias, self.values.as_slice()) {
            (Some(alias), [_]) => columns.push(alias.clone()),
            _ => columns.extend(self.values.iter().map(|field| field.name().to_string())),
        }
        columns
    }

    /// Checks the query before any record is read.
    pub fn validate(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(QueryError::NoValueColumns);
        }
        if self.alias.is_some() && self.values.len() != 1 {
            return Err(QueryError::AliasWithManyValues {
                count: self.values.len(),
            });
        }
        if self.agg.needs_numeric()
            && let Some(field) = self.values.iter().find(|field| !field.is_numeric())
        {
            return Err(QueryError::NonNumericField {
                agg: self.agg,
                field: *field,
            });
        }
        let columns = self.output_columns();
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(QueryError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        for key in &self.sort_by {
            if !columns.contains(&key.column) {
                return Err(QueryError::UnknownSortColumn {
                    column: key.column.clone(),
                    available: columns.join(", "),
                });
            }
        }
        Ok(())
    }
}

/// Rounds half away from zero to 2 decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds every value column (those after the group keys) to 2 decimals.
fn round_value_columns(table: &mut ResultTable, first_value: usize) {
    for row in table.rows_mut() {
        for value in row.iter_mut().skip(first_value) {
            if let Value::Float(v) = value {
                *v = round2(*v);
            }
        }
    }
}

/// Running state of one value column within one group.
#[derive(Debug, Default)]
struct Accumulator {
    rows: usize,
    int_sum: Option<i64>,
    float_sum: f64,
    all_int: bool,
    distinct: HashSet<Value>,
    max: Option<Value>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            int_sum: Some(0),
            all_int: true,
            ..Self::default()
        }
    }

    fn push(&mut self, agg: Aggregation, value: Value) {
        self.rows += 1;
        match agg {
            Aggregation::Count => {}
            Aggregation::Sum | Aggregation::Mean | Aggregation::PerRecord => {
                if let Value::Int(v) = value {
                    self.int_sum = self.int_sum.and_then(|sum| sum.checked_add(v));
                } else {
                    self.all_int = false;
                }
                self.float_sum += value.as_f64().unwrap_or_default();
            }
            Aggregation::NUnique => {
                self.distinct.insert(value);
            }
            Aggregation::Max => {
                if self.max.as_ref().is_none_or(|current| value > *current) {
                    self.max = Some(value);
                }
            }
        }
    }

    fn finish(self, agg: Aggregation) -> Value {
        match agg {
            Aggregation::Count => Value::Int(count_value(self.rows)),
            Aggregation::Sum => match (self.all_int, self.int_sum) {
                (true, Some(sum)) => Value::Int(sum),
                _ => Value::Float(self.float_sum),
            },
            // Rounded once the table is sorted, so ranking sees the exact mean.
            Aggregation::Mean | Aggregation::PerRecord => {
                Value::Float(self.float_sum / self.rows as f64)
            }
            Aggregation::NUnique => Value::Int(count_value(self.distinct.len())),
            // Groups are never empty, so a maximum always exists.
            Aggregation::Max => self.max.unwrap_or(Value::Int(0)),
        }
    }
}

fn count_value(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Sorts rows by the given keys; equal rows keep their relative order.
pub(crate) fn sort_rows(table: &mut ResultTable, keys: &[SortKey]) {
    let resolved: Vec<(usize, SortDirection)> = keys
        .iter()
        .filter_map(|key| {
            table
                .column_index(&key.column)
                .map(|idx| (idx, key.direction))
        })
        .collect();
    if resolved.is_empty() {
        return;
    }
    table.rows_mut().sort_by(|a, b| {
        for (idx, direction) in &resolved {
            let ordering = match direction {
                SortDirection::Ascending => a[*idx].cmp(&b[*idx]),
                SortDirection::Descending => b[*idx].cmp(&a[*idx]),
            };
            if ordering.is_ne() {
                return ordering;
            }
        }
        std::cmp::Ordering::Equal
    });
}

/// Groups the records accepted by `predicate` and reduces each group.
///
/// The query is validated first; an invalid query fails without scanning.
pub fn aggregate<P>(
    records: &[RestaurantRecord],
    predicate: &P,
    query: &AggregateQuery,
) -> Result<ResultTable>
where
    P: Predicate + ?Sized,
{
    query.validate()?;

    let mut index: HashMap<Vec<Value>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<Value>, Vec<Accumulator>)> = Vec::new();
    for record in select(records, predicate) {
        let key: Vec<Value> = query
            .group_by
            .iter()
            .map(|field| field.value(record))
            .collect();
        let slot = match index.get(&key) {
            Some(slot) => *slot,
            None => {
                index.insert(key.clone(), groups.len());
                let accumulators = query.values.iter().map(|_| Accumulator::new()).collect();
                groups.push((key, accumulators));
                groups.len() - 1
            }
        };
        let (_, accumulators) = &mut groups[slot];
        for (field, acc) in query.values.iter().zip(accumulators.iter_mut()) {
            acc.push(query.agg, field.value(record));
        }
    }

    let mut table = ResultTable::new(query.output_columns());
    for (key, accumulators) in groups {
        let mut row = key;
        row.extend(accumulators.into_iter().map(|acc| acc.finish(query.agg)));
        table.push_row(row);
    }
    sort_rows(&mut table, &query.sort_by);
    if let Some(limit) = query.limit {
        table.rows_mut().truncate(limit);
    }
    if query.agg.is_rounded() {
        round_value_columns(&mut table, query.group_by.len());
    }

    debug!(
        agg = %query.agg,
        groups = index.len(),
        rows = table.len(),
        "Aggregated records"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.346), 2.35);
    }

    #[test]
    fn validation_rejects_malformed_queries() {
        let no_values = AggregateQuery::new(Aggregation::Count).group_by([Field::Country]);
        assert!(matches!(
            no_values.validate(),
            Err(QueryError::NoValueColumns)
        ));

        let text_mean = AggregateQuery::new(Aggregation::Mean).value(Field::City);
        assert!(matches!(
            text_mean.validate(),
            Err(QueryError::NonNumericField {
                field: Field::City,
                ..
            })
        ));

        let bad_sort = AggregateQuery::new(Aggregation::Count)
            .group_by([Field::Country])
            .value(Field::RestaurantId)
            .sort_by(SortKey::desc("votes"));
        assert!(matches!(
            bad_sort.validate(),
            Err(QueryError::UnknownSortColumn { .. })
        ));

        let alias_many = AggregateQuery::new(Aggregation::Max)
            .values([Field::Rating, Field::Votes])
            .alias("best");
        assert!(matches!(
            alias_many.validate(),
            Err(QueryError::AliasWithManyValues { count: 2 })
        ));

        let duplicated = AggregateQuery::new(Aggregation::Max)
            .group_by([Field::Country])
            .value(Field::Country);
        assert!(matches!(
            duplicated.validate(),
            Err(QueryError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn output_columns_use_alias_for_single_value() {
        let query = AggregateQuery::new(Aggregation::Count)
            .group_by([Field::Country, Field::City])
            .value(Field::RestaurantId)
            .alias("restaurants");
        assert_eq!(query.output_columns(), ["country", "city", "restaurants"]);
    }
}
