//! Whole-record ranking.
//!
//! Unlike [`Aggregation::Max`](crate::Aggregation::Max), which takes each
//! column's maximum on its own, ranking picks entire records: the best record
//! carries its own rating, votes and name together.

use std::cmp::Ordering;
use std::collections::HashMap;

use dine_model::{Field, RestaurantRecord, Value};
use tracing::debug;

use crate::filter::{Predicate, select};
use crate::table::ResultTable;

/// Column prepended to ranked tables, 1-based within each group.
pub const RANK_COLUMN: &str = "rank";

/// Best-first order: rating desc, then votes desc, then id asc.
///
/// Ids are unique, so this is a total order over a record set.
pub fn best_first(a: &RestaurantRecord, b: &RestaurantRecord) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| b.votes.cmp(&a.votes))
        .then_with(|| a.id.cmp(&b.id))
}

fn eligible<'a, 'p, P>(
    records: &'a [RestaurantRecord],
    predicate: &'p P,
    min_votes: Option<u64>,
) -> impl Iterator<Item = &'a RestaurantRecord> + 'p
where
    'a: 'p,
    P: Predicate + ?Sized,
{
    let min_votes = min_votes.unwrap_or(0);
    select(records, predicate).filter(move |record| record.votes >= min_votes)
}

/// Top `n` records of each group, groups in first-seen order.
///
/// Groups with fewer than `n` eligible records return what they have.
pub fn best_per_group_records<'a, P>(
    records: &'a [RestaurantRecord],
    predicate: &P,
    group_key: Field,
    min_votes: Option<u64>,
    n: usize,
) -> Vec<(Value, Vec<&'a RestaurantRecord>)>
where
    P: Predicate + ?Sized,
{
    if n == 0 {
        return Vec::new();
    }
    let mut index: HashMap<Value, usize> = HashMap::new();
    let mut groups: Vec<(Value, Vec<&'a RestaurantRecord>)> = Vec::new();
    for record in eligible(records, predicate, min_votes) {
        let key = group_key.value(record);
        let slot = match index.get(&key) {
            Some(slot) => *slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, Vec::new()));
                groups.len() - 1
            }
        };
        groups[slot].1.push(record);
    }
    for (_, members) in &mut groups {
        members.sort_by(|a, b| best_first(a, b));
        members.truncate(n);
    }
    groups
}

/// Top `n` records overall.
pub fn best_overall_records<'a, P>(
    records: &'a [RestaurantRecord],
    predicate: &P,
    min_votes: Option<u64>,
    n: usize,
) -> Vec<&'a RestaurantRecord>
where
    P: Predicate + ?Sized,
{
    let mut ranked: Vec<&RestaurantRecord> = eligible(records, predicate, min_votes).collect();
    ranked.sort_by(|a, b| best_first(a, b));
    ranked.truncate(n);
    ranked
}

fn ranked_table() -> ResultTable {
    let mut columns = vec![RANK_COLUMN.to_string()];
    columns.extend(Field::ALL.iter().map(|field| field.name().to_string()));
    ResultTable::new(columns)
}

fn ranked_row(rank: usize, record: &RestaurantRecord) -> Vec<Value> {
    let mut row = Vec::with_capacity(Field::ALL.len() + 1);
    row.push(Value::Int(i64::try_from(rank).unwrap_or(i64::MAX)));
    row.extend(Field::ALL.iter().map(|field| field.value(record)));
    row
}

/// Top `n` records per group as a table with a leading rank column.
pub fn best_per_group<P>(
    records: &[RestaurantRecord],
    predicate: &P,
    group_key: Field,
    min_votes: Option<u64>,
    n: usize,
) -> ResultTable
where
    P: Predicate + ?Sized,
{
    let groups = best_per_group_records(records, predicate, group_key, min_votes, n);
    let mut table = ranked_table();
    for (_, members) in &groups {
        for (pos, record) in members.iter().enumerate() {
            table.push_row(ranked_row(pos + 1, record));
        }
    }
    debug!(
        group_key = %group_key,
        groups = groups.len(),
        rows = table.len(),
        "Ranked records per group"
    );
    table
}

/// Top `n` records overall as a table with a leading rank column.
pub fn best_overall<P>(
    records: &[RestaurantRecord],
    predicate: &P,
    min_votes: Option<u64>,
    n: usize,
) -> ResultTable
where
    P: Predicate + ?Sized,
{
    let mut table = ranked_table();
    for (pos, record) in best_overall_records(records, predicate, min_votes, n)
        .into_iter()
        .enumerate()
    {
        table.push_row(ranked_row(pos + 1, record));
    }
    table
}
