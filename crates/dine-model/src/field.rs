//! Addressable record attributes and the cell values they produce.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::record::RestaurantRecord;

/// A canonical record attribute that queries can group, aggregate or sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    RestaurantId,
    RestaurantName,
    CountryCode,
    Country,
    City,
    Address,
    Locality,
    LocalityVerbose,
    Longitude,
    Latitude,
    Cuisine,
    AverageCostForTwo,
    Currency,
    HasTableBooking,
    HasOnlineDelivery,
    IsDeliveringNow,
    PriceTier,
    Rating,
    RatingColor,
    RatingText,
    Votes,
}

impl Field {
    /// Every field, in canonical column order.
    pub const ALL: [Field; 21] = [
        Field::RestaurantId,
        Field::RestaurantName,
        Field::CountryCode,
        Field::Country,
        Field::City,
        Field::Address,
        Field::Locality,
        Field::LocalityVerbose,
        Field::Longitude,
        Field::Latitude,
        Field::Cuisine,
        Field::AverageCostForTwo,
        Field::Currency,
        Field::HasTableBooking,
        Field::HasOnlineDelivery,
        Field::IsDeliveringNow,
        Field::PriceTier,
        Field::Rating,
        Field::RatingColor,
        Field::RatingText,
        Field::Votes,
    ];

    /// Stable canonical column name.
    pub fn name(self) -> &'static str {
        match self {
            Field::RestaurantId => "restaurant_id",
            Field::RestaurantName => "restaurant_name",
            Field::CountryCode => "country_code",
            Field::Country => "country",
            Field::City => "city",
            Field::Address => "address",
            Field::Locality => "locality",
            Field::LocalityVerbose => "locality_verbose",
            Field::Longitude => "longitude",
            Field::Latitude => "latitude",
            Field::Cuisine => "cuisine",
            Field::AverageCostForTwo => "average_cost_for_two",
            Field::Currency => "currency",
            Field::HasTableBooking => "has_table_booking",
            Field::HasOnlineDelivery => "has_online_delivery",
            Field::IsDeliveringNow => "is_delivering_now",
            Field::PriceTier => "price_tier",
            Field::Rating => "rating",
            Field::RatingColor => "rating_color",
            Field::RatingText => "rating_text",
            Field::Votes => "votes",
        }
    }

    /// Looks a field up by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Whether the field holds numbers that can be summed or averaged.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Field::RestaurantId
                | Field::CountryCode
                | Field::Longitude
                | Field::Latitude
                | Field::AverageCostForTwo
                | Field::Rating
                | Field::Votes
        )
    }

    /// Reads this attribute from a record.
    pub fn value(self, record: &RestaurantRecord) -> Value {
        match self {
            Field::RestaurantId => Value::Int(record.id),
            Field::RestaurantName => Value::Text(record.name.clone()),
            Field::CountryCode => Value::Int(record.country_code),
            Field::Country => Value::Text(record.country.clone()),
            Field::City => Value::Text(record.city.clone()),
            Field::Address => Value::Text(record.address.clone()),
            Field::Locality => Value::Text(record.locality.clone()),
            Field::LocalityVerbose => Value::Text(record.locality_verbose.clone()),
            Field::Longitude => Value::Float(record.longitude),
            Field::Latitude => Value::Float(record.latitude),
            Field::Cuisine => Value::Text(record.cuisine.clone()),
            Field::AverageCostForTwo => Value::Float(record.average_cost_for_two),
            Field::Currency => Value::Text(record.currency.clone()),
            Field::HasTableBooking => Value::Bool(record.has_table_booking),
            Field::HasOnlineDelivery => Value::Bool(record.has_online_delivery),
            Field::IsDeliveringNow => Value::Bool(record.is_delivering_now),
            Field::PriceTier => Value::Text(record.price_tier.as_str().to_string()),
            Field::Rating => Value::Float(record.rating),
            Field::RatingColor => Value::Text(record.rating_color.clone()),
            Field::RatingText => Value::Text(record.rating_text.clone()),
            Field::Votes => Value::Int(i64::try_from(record.votes).unwrap_or(i64::MAX)),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single result-table cell.
///
/// `Value` has a total order so that grouping and sorting never depend on
/// container iteration order: booleans sort before numbers, numbers before
/// text, integers and floats compare numerically, and floats use
/// [`f64::total_cmp`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(_) | Value::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Bool(_) | Value::Float(_) | Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Text(_) => 2,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            // Mixed numbers compare by value, ints first on exact ties.
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Bool(v) => {
                0u8.hash(state);
                v.hash(state);
            }
            Value::Int(v) => {
                1u8.hash(state);
                v.hash(state);
            }
            Value::Float(v) => {
                2u8.hash(state);
                v.to_bits().hash(state);
            }
            Value::Text(v) => {
                3u8.hash(state);
                v.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}
