use std::io::Write;

use dine_model::{Field, LookupError, LookupTables, PriceTier, RecordSet, RestaurantRecord, Value};
use tempfile::NamedTempFile;

fn record(id: i64, name: &str, votes: u64) -> RestaurantRecord {
    RestaurantRecord {
        id,
        name: name.to_string(),
        country_code: 30,
        country: "Brazil".to_string(),
        city: "Rio de Janeiro".to_string(),
        address: "Rua 1".to_string(),
        locality: "Centro".to_string(),
        locality_verbose: "Centro, Rio de Janeiro".to_string(),
        longitude: -43.2,
        latitude: -22.9,
        cuisine: "Brazilian".to_string(),
        average_cost_for_two: 120.0,
        currency: "Brazilian Real(R$)".to_string(),
        has_table_booking: false,
        has_online_delivery: true,
        is_delivering_now: false,
        price_tier: PriceTier::Expensive,
        rating: 4.3,
        rating_color: "green".to_string(),
        rating_text: "Very Good".to_string(),
        votes,
    }
}

#[test]
fn field_values_read_record_attributes() {
    let r = record(7, "Bar do Zé", 321);
    assert_eq!(Field::RestaurantId.value(&r), Value::Int(7));
    assert_eq!(Field::Votes.value(&r), Value::Int(321));
    assert_eq!(Field::Rating.value(&r), Value::Float(4.3));
    assert_eq!(Field::PriceTier.value(&r), Value::from("expensive"));
    assert_eq!(Field::HasOnlineDelivery.value(&r), Value::Bool(true));
    assert_eq!(Field::Country.value(&r), Value::from("Brazil"));
}

#[test]
fn numeric_fields_are_flagged() {
    assert!(Field::Votes.is_numeric());
    assert!(Field::AverageCostForTwo.is_numeric());
    assert!(!Field::Cuisine.is_numeric());
    assert!(!Field::HasTableBooking.is_numeric());
}

#[test]
fn record_set_lookup_by_id() {
    let set = RecordSet::new(vec![record(1, "A", 10), record(2, "B", 20)]);
    assert_eq!(set.len(), 2);
    assert_eq!(set.get(2).map(|r| r.name.as_str()), Some("B"));
    assert!(set.get(3).is_none());
    // Deref to a slice for iteration.
    assert_eq!(set.iter().map(|r| r.votes).sum::<u64>(), 30);
}

#[test]
fn lookup_tables_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"countries": {{"30": "Brasil"}}, "rating_colors": {{"3F7E00": "verde"}}}}"#
    )
    .unwrap();
    let tables = LookupTables::from_json_path(file.path()).unwrap();
    assert_eq!(tables.countries.get(&30).map(String::as_str), Some("Brasil"));
    assert_eq!(tables.rating_colors.len(), 1);
}

#[test]
fn lookup_tables_report_missing_file() {
    let err = LookupTables::from_json_path(std::path::Path::new("/nonexistent/tables.json"))
        .unwrap_err();
    assert!(matches!(err, LookupError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/tables.json"));
}

#[test]
fn lookup_tables_report_malformed_json() {
    let err = LookupTables::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, LookupError::Parse { path: None, .. }));
    assert!(err.to_string().contains("<inline>"));
}
