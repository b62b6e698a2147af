//! Tests for filtering, aggregation and ranking on hand-built records.

use dine_model::{Field, PriceTier, RestaurantRecord, Value};
use dine_query::{
    AggregateQuery, Aggregation, FilterComposer, Predicate, QueryError, QueryWarning, RANK_COLUMN,
    RatingRange, RecordFilter, SortDirection, SortKey, aggregate, best_overall,
    best_overall_records, best_per_group, best_per_group_records, views,
};
use proptest::prelude::*;

fn record(id: i64, country: &str, cuisine: &str, rating: f64, votes: u64) -> RestaurantRecord {
    RestaurantRecord {
        id,
        name: format!("Restaurant {id}"),
        country_code: 0,
        country: country.to_string(),
        city: format!("{country} City"),
        address: "1 Main Street".to_string(),
        locality: "Centre".to_string(),
        locality_verbose: "Centre, City".to_string(),
        longitude: 0.0,
        latitude: 0.0,
        cuisine: cuisine.to_string(),
        average_cost_for_two: 50.0,
        currency: "Dollar($)".to_string(),
        has_table_booking: false,
        has_online_delivery: false,
        is_delivering_now: false,
        price_tier: PriceTier::Normal,
        rating,
        rating_color: "green".to_string(),
        rating_text: "Very Good".to_string(),
        votes,
    }
}

fn ids(records: &[&RestaurantRecord]) -> Vec<i64> {
    records.iter().map(|r| r.id).collect()
}

fn sample() -> Vec<RestaurantRecord> {
    vec![
        record(1, "Brazil", "Italian", 4.5, 200),
        record(2, "Brazil", "Italian", 4.5, 200),
        record(3, "India", "North Indian", 3.9, 40),
        record(4, "Brazil", "Brazilian", 4.9, 1500),
        record(5, "India", "Italian", 2.0, 10),
        record(6, "Canada", "Burger", 4.5, 300),
    ]
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn empty_country_selection_matches_nothing() {
    let filter = FilterComposer::compose(
        Some(Vec::<String>::new()),
        None::<Vec<String>>,
        None,
        None,
    );
    assert!(sample().iter().all(|r| !filter.matches(r)));
}

#[test]
fn omitted_criteria_match_everything() {
    let filter = RecordFilter::all();
    assert!(sample().iter().all(|r| filter.matches(r)));
}

#[test]
fn criteria_are_combined_with_and() {
    let records = sample();
    let filter = FilterComposer::new()
        .countries(["Brazil", "India"])
        .cuisines(["Italian"])
        .min_votes(200)
        .rating_range(RatingRange::new(Some(4.5), Some(4.5)))
        .build();
    let matched: Vec<i64> = records
        .iter()
        .filter(|r| filter.matches(r))
        .map(|r| r.id)
        .collect();
    assert_eq!(matched, vec![1, 2]);
}

#[test]
fn closures_are_predicates() {
    let records = sample();
    let high = |r: &RestaurantRecord| r.rating >= 4.5;
    let table = best_overall(&records, &high, None, 10);
    assert_eq!(table.len(), 4);
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn count_groups_in_first_seen_order_with_stable_ties() {
    let records = sample();
    let query = AggregateQuery::new(Aggregation::Count)
        .group_by([Field::Country])
        .value(Field::RestaurantId)
        .sort_by(SortKey::desc("restaurant_id"));
    let table = aggregate(&records, &RecordFilter::all(), &query).unwrap();

    assert_eq!(table.columns(), ["country", "restaurant_id"]);
    let countries: Vec<&Value> = table.column("country").unwrap();
    assert_eq!(
        countries,
        vec![
            &Value::from("Brazil"),
            &Value::from("India"),
            &Value::from("Canada")
        ]
    );
    let counts: Vec<i64> = table
        .column("restaurant_id")
        .unwrap()
        .into_iter()
        .filter_map(Value::as_i64)
        .collect();
    assert_eq!(counts, vec![3, 2, 1]);
}

#[test]
fn per_record_ratio_is_not_a_mean_of_ratios() {
    let records = sample();
    let query = AggregateQuery::new(Aggregation::PerRecord)
        .group_by([Field::Country])
        .value(Field::Votes)
        .alias("votes_per_restaurant");
    let table = aggregate(&records, &RecordFilter::all(), &query).unwrap();
    // Brazil: (200 + 200 + 1500) / 3
    assert_eq!(
        table.cell(0, "votes_per_restaurant"),
        Some(&Value::Float(633.33))
    );
    // India: (40 + 10) / 2
    assert_eq!(
        table.cell(1, "votes_per_restaurant"),
        Some(&Value::Float(25.0))
    );
}

#[test]
fn means_are_ranked_before_rounding() {
    // A: (4.473 + 4.509) / 2 = 4.491, B: 4.494; both round to 4.49.
    let records = vec![
        record(1, "Brazil", "A", 4.473, 200),
        record(2, "Brazil", "A", 4.509, 200),
        record(3, "Brazil", "B", 4.494, 200),
    ];
    let best = views::cuisines_by_mean_rating(
        &records,
        &RecordFilter::all(),
        SortDirection::Descending,
        100,
        1,
    )
    .unwrap();
    assert_eq!(best.column("cuisine").unwrap(), vec![&Value::from("B")]);
    assert_eq!(best.cell(0, views::MEAN_RATING_COLUMN), Some(&Value::Float(4.49)));

    let worst = views::cuisines_by_mean_rating(
        &records,
        &RecordFilter::all(),
        SortDirection::Ascending,
        100,
        1,
    )
    .unwrap();
    assert_eq!(worst.column("cuisine").unwrap(), vec![&Value::from("A")]);
}

#[test]
fn max_is_taken_per_column() {
    let records = vec![
        record(1, "Brazil", "Italian", 4.9, 10),
        record(2, "Brazil", "Italian", 3.0, 900),
    ];
    let query = AggregateQuery::new(Aggregation::Max)
        .group_by([Field::Country])
        .values([Field::Rating, Field::Votes]);
    let table = aggregate(&records, &RecordFilter::all(), &query).unwrap();
    assert_eq!(table.cell(0, "rating"), Some(&Value::Float(4.9)));
    assert_eq!(table.cell(0, "votes"), Some(&Value::Int(900)));
}

#[test]
fn sum_of_integers_stays_integral() {
    let records = sample();
    let query = AggregateQuery::new(Aggregation::Sum)
        .group_by([Field::Country])
        .value(Field::Votes);
    let table = aggregate(&records, &RecordFilter::all(), &query).unwrap();
    assert_eq!(table.cell(0, "votes"), Some(&Value::Int(1900)));
}

#[test]
fn nunique_counts_distinct_values() {
    let records = sample();
    let query = AggregateQuery::new(Aggregation::NUnique)
        .group_by([Field::Country])
        .value(Field::Cuisine);
    let table = aggregate(&records, &RecordFilter::all(), &query).unwrap();
    assert_eq!(table.cell(0, "cuisine"), Some(&Value::Int(2)));
    assert_eq!(table.cell(1, "cuisine"), Some(&Value::Int(2)));
    assert_eq!(table.cell(2, "cuisine"), Some(&Value::Int(1)));
}

#[test]
fn limit_beyond_row_count_returns_everything() {
    let records = sample();
    let query = AggregateQuery::new(Aggregation::Count)
        .group_by([Field::Country])
        .value(Field::RestaurantId)
        .limit(50);
    let table = aggregate(&records, &RecordFilter::all(), &query).unwrap();
    assert_eq!(table.len(), 3);
}

#[test]
fn empty_selection_is_an_empty_table_not_an_error() {
    let records = sample();
    let nothing = FilterComposer::new().countries(["Atlantis"]).build();
    let query = AggregateQuery::new(Aggregation::Mean)
        .group_by([Field::Country])
        .value(Field::Rating);
    let table = aggregate(&records, &nothing, &query).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.warning(), Some(QueryWarning::EmptyResult));
    assert_eq!(table.columns(), ["country", "rating"]);
}

#[test]
fn malformed_query_fails_before_scanning() {
    let scanned = std::cell::Cell::new(0);
    let counting = |_: &RestaurantRecord| {
        scanned.set(scanned.get() + 1);
        true
    };
    let query = AggregateQuery::new(Aggregation::Sum)
        .group_by([Field::Country])
        .value(Field::Cuisine);
    let err = aggregate(&sample(), &counting, &query).unwrap_err();
    assert!(matches!(err, QueryError::NonNumericField { .. }));
    assert_eq!(scanned.get(), 0);
}

// ============================================================================
// Ranking
// ============================================================================

#[test]
fn ties_break_on_lower_id() {
    let records = vec![
        record(2, "Brazil", "Italian", 4.5, 200),
        record(1, "Brazil", "Italian", 4.5, 200),
    ];
    let groups = best_per_group_records(&records, &RecordFilter::all(), Field::Cuisine, None, 1);
    assert_eq!(groups.len(), 1);
    assert_eq!(ids(&groups[0].1), vec![1]);
}

#[test]
fn best_per_group_picks_whole_records() {
    let records = sample();
    let table = best_per_group(&records, &RecordFilter::all(), Field::Country, None, 2);

    assert_eq!(table.columns()[0], RANK_COLUMN);
    let pairs: Vec<(i64, i64)> = (0..table.len())
        .map(|row| {
            (
                table.cell(row, RANK_COLUMN).and_then(Value::as_i64).unwrap(),
                table.cell(row, "restaurant_id").and_then(Value::as_i64).unwrap(),
            )
        })
        .collect();
    // Brazil: 4 (4.9), 1 (4.5, id tie-break over 2); India: 3, 5; Canada: 6
    assert_eq!(pairs, vec![(1, 4), (2, 1), (1, 3), (2, 5), (1, 6)]);
}

#[test]
fn min_votes_excludes_low_vote_records() {
    let records = sample();
    let best = best_overall_records(&records, &RecordFilter::all(), Some(250), 10);
    assert_eq!(ids(&best), vec![4, 6]);
}

#[test]
fn zero_n_yields_empty_results() {
    let records = sample();
    assert!(best_overall(&records, &RecordFilter::all(), None, 0).is_empty());
    assert!(best_per_group(&records, &RecordFilter::all(), Field::Cuisine, None, 0).is_empty());
}

#[test]
fn groups_smaller_than_n_are_not_padded() {
    let records = sample();
    let groups = best_per_group_records(&records, &RecordFilter::all(), Field::Country, None, 5);
    let sizes: Vec<usize> = groups.iter().map(|(_, members)| members.len()).collect();
    assert_eq!(sizes, vec![3, 2, 1]);
}

// ============================================================================
// Properties
// ============================================================================

fn record_strategy() -> impl Strategy<Value = (String, String, u8, u64)> {
    (
        prop::sample::select(vec!["Brazil", "India", "Canada", "Qatar"]).prop_map(String::from),
        prop::sample::select(vec!["Italian", "Burger", "Sushi"]).prop_map(String::from),
        0u8..=10,
        0u64..500,
    )
}

fn build(rows: &[(String, String, u8, u64)]) -> Vec<RestaurantRecord> {
    rows.iter()
        .enumerate()
        .map(|(idx, (country, cuisine, rating, votes))| {
            record(
                i64::try_from(idx).unwrap() + 1,
                country,
                cuisine,
                f64::from(*rating) / 2.0,
                *votes,
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn grouped_counts_sum_to_filtered_total(
        rows in prop::collection::vec(record_strategy(), 0..40),
        min_votes in 0u64..300,
    ) {
        let records = build(&rows);
        let filter = FilterComposer::new().min_votes(min_votes).build();
        let query = AggregateQuery::new(Aggregation::Count)
            .group_by([Field::Country, Field::Cuisine])
            .value(Field::RestaurantId);
        let table = aggregate(&records, &filter, &query).unwrap();
        let total: i64 = table
            .column("restaurant_id")
            .unwrap()
            .into_iter()
            .filter_map(Value::as_i64)
            .sum();
        let expected = records.iter().filter(|r| filter.matches(r)).count();
        prop_assert_eq!(total, i64::try_from(expected).unwrap());
    }

    #[test]
    fn limit_is_a_prefix_of_the_unlimited_result(
        rows in prop::collection::vec(record_strategy(), 0..40),
        limit in 0usize..8,
    ) {
        let records = build(&rows);
        let base = AggregateQuery::new(Aggregation::Mean)
            .group_by([Field::Country, Field::Cuisine])
            .value(Field::Rating)
            .sort_by(SortKey::desc("rating"));
        let full = aggregate(&records, &RecordFilter::all(), &base).unwrap();
        let limited =
            aggregate(&records, &RecordFilter::all(), &base.clone().limit(limit)).unwrap();
        prop_assert_eq!(limited.len(), limit.min(full.len()));
        prop_assert_eq!(limited.rows(), &full.rows()[..limited.len()]);
    }

    #[test]
    fn ranking_is_deterministic_and_ordered(
        rows in prop::collection::vec(record_strategy(), 0..40),
    ) {
        let records = build(&rows);
        let first = best_overall_records(&records, &RecordFilter::all(), None, records.len());
        let mut reversed = records.clone();
        reversed.reverse();
        let second = best_overall_records(&reversed, &RecordFilter::all(), None, reversed.len());
        prop_assert_eq!(ids(&first), ids(&second));
        for pair in first.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(
                a.rating > b.rating
                    || (a.rating == b.rating && a.votes > b.votes)
                    || (a.rating == b.rating && a.votes == b.votes && a.id < b.id)
            );
        }
    }
}
