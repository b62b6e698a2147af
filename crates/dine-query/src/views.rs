//! Named dashboard queries.
//!
//! Every view takes the caller's [`RecordFilter`] and narrows it further
//! where the view needs to (rating bands, vote thresholds, one cuisine).

use std::collections::HashSet;

use dine_model::{Field, RestaurantRecord, Value};
use serde::Serialize;

use crate::aggregate::{AggregateQuery, Aggregation, SortDirection, SortKey, aggregate};
use crate::error::Result;
use crate::filter::{Predicate, RatingRange, RecordFilter, select};
use crate::ranked::{best_overall, best_per_group};
use crate::table::ResultTable;

pub const RESTAURANTS_COLUMN: &str = "restaurants";
pub const CITIES_COLUMN: &str = "cities";
pub const CUISINES_COLUMN: &str = "cuisines";
pub const VOTES_PER_RESTAURANT_COLUMN: &str = "votes_per_restaurant";
pub const MEAN_COST_COLUMN: &str = "mean_cost_for_two";
pub const MEAN_RATING_COLUMN: &str = "mean_rating";

/// Fields shown on the restaurant map.
pub const MAP_MARKER_FIELDS: [Field; 8] = [
    Field::RestaurantName,
    Field::AverageCostForTwo,
    Field::Currency,
    Field::Cuisine,
    Field::Rating,
    Field::RatingColor,
    Field::Latitude,
    Field::Longitude,
];

/// Headline counts for the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub restaurants: usize,
    pub countries: usize,
    pub cities: usize,
    pub cuisines: usize,
    pub total_votes: u64,
}

impl Overview {
    pub fn to_table(&self) -> ResultTable {
        let mut table = ResultTable::new([
            RESTAURANTS_COLUMN,
            "countries",
            CITIES_COLUMN,
            CUISINES_COLUMN,
            "total_votes",
        ]);
        let count = |n: usize| Value::Int(i64::try_from(n).unwrap_or(i64::MAX));
        table.push_row(vec![
            count(self.restaurants),
            count(self.countries),
            count(self.cities),
            count(self.cuisines),
            Value::Int(i64::try_from(self.total_votes).unwrap_or(i64::MAX)),
        ]);
        table
    }
}

pub fn overview(records: &[RestaurantRecord], filter: &RecordFilter) -> Overview {
    let mut ids = HashSet::new();
    let mut countries = HashSet::new();
    let mut cities = HashSet::new();
    let mut cuisines = HashSet::new();
    let mut total_votes = 0u64;
    for record in select(records, filter) {
        ids.insert(record.id);
        countries.insert(record.country.as_str());
        cities.insert(record.city.as_str());
        cuisines.insert(record.cuisine.as_str());
        total_votes = total_votes.saturating_add(record.votes);
    }
    Overview {
        restaurants: ids.len(),
        countries: countries.len(),
        cities: cities.len(),
        cuisines: cuisines.len(),
        total_votes,
    }
}

fn by_country(agg: Aggregation, value: Field, alias: &str) -> AggregateQuery {
    AggregateQuery::new(agg)
        .group_by([Field::Country])
        .value(value)
        .alias(alias)
        .sort_by(SortKey::desc(alias))
}

fn by_city(agg: Aggregation, value: Field, alias: &str, n: usize) -> AggregateQuery {
    AggregateQuery::new(agg)
        .group_by([Field::Country, Field::City])
        .value(value)
        .alias(alias)
        .sort_by(SortKey::desc(alias))
        .limit(n)
}

pub fn restaurants_by_country(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
) -> Result<ResultTable> {
    let query = by_country(Aggregation::Count, Field::RestaurantId, RESTAURANTS_COLUMN);
    aggregate(records, filter, &query)
}

pub fn cities_by_country(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
) -> Result<ResultTable> {
    let query = by_country(Aggregation::NUnique, Field::City, CITIES_COLUMN);
    aggregate(records, filter, &query)
}

pub fn votes_per_restaurant_by_country(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
) -> Result<ResultTable> {
    let query = by_country(
        Aggregation::PerRecord,
        Field::Votes,
        VOTES_PER_RESTAURANT_COLUMN,
    );
    aggregate(records, filter, &query)
}

pub fn cost_for_two_by_country(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
) -> Result<ResultTable> {
    let query = by_country(Aggregation::Mean, Field::AverageCostForTwo, MEAN_COST_COLUMN);
    aggregate(records, filter, &query)
}

pub fn top_cities_by_restaurants(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
    n: usize,
) -> Result<ResultTable> {
    let query = by_city(Aggregation::Count, Field::RestaurantId, RESTAURANTS_COLUMN, n);
    aggregate(records, filter, &query)
}

/// Rating bands used to rank cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBand {
    /// Rating of 4.0 or more.
    High,
    /// Rating of 2.5 or less.
    Low,
}

impl RatingBand {
    pub fn range(self) -> RatingRange {
        match self {
            RatingBand::High => RatingRange::at_least(4.0),
            RatingBand::Low => RatingRange::at_most(2.5),
        }
    }
}

/// Cities with the most restaurants inside a rating band.
pub fn cities_by_rating_band(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
    band: RatingBand,
    n: usize,
) -> Result<ResultTable> {
    let range = band.range();
    let predicate =
        |record: &RestaurantRecord| filter.matches(record) && range.contains(record.rating);
    let query = by_city(Aggregation::Count, Field::RestaurantId, RESTAURANTS_COLUMN, n);
    aggregate(records, &predicate, &query)
}

pub fn top_cities_by_unique_cuisines(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
    n: usize,
) -> Result<ResultTable> {
    let query = by_city(Aggregation::NUnique, Field::Cuisine, CUISINES_COLUMN, n);
    aggregate(records, filter, &query)
}

/// The single best restaurant serving `cuisine`.
pub fn best_restaurant_for_cuisine(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
    cuisine: &str,
) -> ResultTable {
    let predicate = |record: &RestaurantRecord| filter.matches(record) && record.cuisine == cuisine;
    best_overall(records, &predicate, None, 1)
}

/// The best restaurant of every cuisine in the selection.
pub fn best_restaurant_per_cuisine(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
) -> ResultTable {
    best_per_group(records, filter, Field::Cuisine, None, 1)
}

/// Restaurants by name with at least `min_votes` votes.
///
/// Chains share a name, so each column holds its own maximum across the
/// chain's restaurants.
pub fn top_restaurants(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
    min_votes: u64,
    n: usize,
) -> Result<ResultTable> {
    let predicate = |record: &RestaurantRecord| filter.matches(record) && record.votes >= min_votes;
    let query = AggregateQuery::new(Aggregation::Max)
        .group_by([Field::RestaurantName])
        .values([Field::Country, Field::Cuisine, Field::Rating, Field::Votes])
        .sort_by(SortKey::desc(Field::Rating.name()))
        .sort_by(SortKey::desc(Field::Votes.name()))
        .limit(n);
    aggregate(records, &predicate, &query)
}

/// Cuisines ranked by mean rating among restaurants with enough votes.
pub fn cuisines_by_mean_rating(
    records: &[RestaurantRecord],
    filter: &RecordFilter,
    order: SortDirection,
    min_votes: u64,
    n: usize,
) -> Result<ResultTable> {
    let predicate = |record: &RestaurantRecord| filter.matches(record) && record.votes >= min_votes;
    let query = AggregateQuery::new(Aggregation::Mean)
        .group_by([Field::Cuisine])
        .value(Field::Rating)
        .alias(MEAN_RATING_COLUMN)
        .sort_by(SortKey {
            column: MEAN_RATING_COLUMN.to_string(),
            direction: order,
        })
        .limit(n);
    aggregate(records, &predicate, &query)
}

/// Map marker projection of the selection, in input order.
pub fn map_markers(records: &[RestaurantRecord], filter: &RecordFilter) -> ResultTable {
    let mut table = ResultTable::new(MAP_MARKER_FIELDS.iter().map(|field| field.name()));
    for record in select(records, filter) {
        table.push_row(
            MAP_MARKER_FIELDS
                .iter()
                .map(|field| field.value(record))
                .collect(),
        );
    }
    table
}
