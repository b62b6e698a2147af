//! Raw snapshot column names and their canonical counterparts.

use crate::field::Field;

/// Legacy column that is always empty in the raw snapshot.
pub const EMPTY_LEGACY_COLUMN: &str = "Switch to order menu";

/// Canonical name of the multi-valued cuisine column before canonicalization.
pub const CUISINES_COLUMN: &str = "cuisines";

/// Fixed, case-sensitive raw -> canonical column renames.
///
/// No canonical name is also a raw name, so applying the map twice is the
/// same as applying it once.
pub const RAW_TO_CANONICAL: [(&str, &str); 20] = [
    ("Restaurant ID", "restaurant_id"),
    ("Restaurant Name", "restaurant_name"),
    ("Country Code", "country_code"),
    ("City", "city"),
    ("Address", "address"),
    ("Locality", "locality"),
    ("Locality Verbose", "locality_verbose"),
    ("Longitude", "longitude"),
    ("Latitude", "latitude"),
    ("Cuisines", "cuisines"),
    ("Average Cost for two", "average_cost_for_two"),
    ("Currency", "currency"),
    ("Has Table booking", "has_table_booking"),
    ("Has Online delivery", "has_online_delivery"),
    ("Is delivering now", "is_delivering_now"),
    ("Price range", "price_range"),
    ("Aggregate rating", "aggregate_rating"),
    ("Rating color", "rating_color_code"),
    ("Rating text", "rating_text"),
    ("Votes", "votes"),
];

/// Canonical frame columns, as produced by the rename step.
pub const CANONICAL_COLUMNS: [&str; 20] = [
    "restaurant_id",
    "restaurant_name",
    "country_code",
    "city",
    "address",
    "locality",
    "locality_verbose",
    "longitude",
    "latitude",
    "cuisines",
    "average_cost_for_two",
    "currency",
    "has_table_booking",
    "has_online_delivery",
    "is_delivering_now",
    "price_range",
    "aggregate_rating",
    "rating_color_code",
    "rating_text",
    "votes",
];

/// Returns the canonical name for a raw column, if it is part of the map.
pub fn canonical_name(raw: &str) -> Option<&'static str> {
    RAW_TO_CANONICAL
        .iter()
        .find(|(from, _)| *from == raw)
        .map(|(_, to)| *to)
}

/// Frame column a record field is built from.
///
/// Resolved fields (`country`, `price_tier`, `rating_color`) read from their
/// coded source column.
pub fn source_column(field: Field) -> &'static str {
    match field {
        Field::RestaurantId => "restaurant_id",
        Field::RestaurantName => "restaurant_name",
        Field::CountryCode | Field::Country => "country_code",
        Field::City => "city",
        Field::Address => "address",
        Field::Locality => "locality",
        Field::LocalityVerbose => "locality_verbose",
        Field::Longitude => "longitude",
        Field::Latitude => "latitude",
        Field::Cuisine => "cuisines",
        Field::AverageCostForTwo => "average_cost_for_two",
        Field::Currency => "currency",
        Field::HasTableBooking => "has_table_booking",
        Field::HasOnlineDelivery => "has_online_delivery",
        Field::IsDeliveringNow => "is_delivering_now",
        Field::PriceTier => "price_range",
        Field::Rating => "aggregate_rating",
        Field::RatingColor => "rating_color_code",
        Field::RatingText => "rating_text",
        Field::Votes => "votes",
    }
}
