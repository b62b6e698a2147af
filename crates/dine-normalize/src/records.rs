//! Typed record building from a cleaned frame.

use std::collections::HashMap;

use dine_ingest::{cell_bool, cell_f64, cell_i64, cell_text};
use dine_model::schema::source_column;
use dine_model::{Field, RecordSet, RestaurantRecord};
use polars::prelude::{AnyValue, Column, DataFrame};
use tracing::info;

use crate::error::{NormalizationError, Result, SchemaError, UnknownCodeError};
use crate::resolver::CodeResolver;

const STEP: &str = "build_records";

/// Columns of a cleaned frame, looked up once.
struct FrameColumns<'a> {
    columns: HashMap<&'static str, &'a Column>,
}

impl<'a> FrameColumns<'a> {
    fn new(df: &'a DataFrame) -> Result<Self> {
        let mut columns = HashMap::new();
        for field in Field::ALL {
            let name = source_column(field);
            if columns.contains_key(name) {
                continue;
            }
            let column = df.column(name).map_err(|_| SchemaError::MissingColumn {
                column: name.to_string(),
                step: STEP,
            })?;
            columns.insert(name, column);
        }
        Ok(Self { columns })
    }

    fn raw(&self, field: Field, row: usize) -> Result<AnyValue<'a>> {
        let name = source_column(field);
        let column: &'a Column = self
            .columns
            .get(name)
            .copied()
            .ok_or_else(|| SchemaError::MissingColumn {
                column: name.to_string(),
                step: STEP,
            })?;
        Ok(column.get(row)?)
    }

    fn text(&self, field: Field, row: usize) -> Result<String> {
        cell_text(&self.raw(field, row)?).ok_or_else(|| {
            SchemaError::MissingValue {
                column: source_column(field).to_string(),
                row,
            }
            .into()
        })
    }

    fn parsed<T>(
        &self,
        field: Field,
        row: usize,
        expected: &'static str,
        parse: impl Fn(&AnyValue<'_>) -> Option<T>,
    ) -> Result<T> {
        let value = self.raw(field, row)?;
        if let Some(parsed) = parse(&value) {
            return Ok(parsed);
        }
        let column = source_column(field).to_string();
        Err(match cell_text(&value) {
            None => SchemaError::MissingValue { column, row },
            Some(text) => SchemaError::InvalidValue {
                column,
                row,
                value: text,
                expected,
            },
        }
        .into())
    }

    fn int(&self, field: Field, row: usize) -> Result<i64> {
        self.parsed(field, row, "an integer", cell_i64)
    }

    fn float(&self, field: Field, row: usize) -> Result<f64> {
        self.parsed(field, row, "a number", cell_f64)
    }

    fn non_negative(&self, field: Field, row: usize) -> Result<f64> {
        self.parsed(field, row, "a non-negative number", |v| {
            cell_f64(v).filter(|n| *n >= 0.0)
        })
    }

    fn count(&self, field: Field, row: usize) -> Result<u64> {
        self.parsed(field, row, "a non-negative integer", |v| {
            cell_i64(v).and_then(|n| u64::try_from(n).ok())
        })
    }

    fn flag(&self, field: Field, row: usize) -> Result<bool> {
        self.parsed(field, row, "a 0/1 flag", cell_bool)
    }
}

fn unknown_code(
    restaurant_id: i64,
    row: usize,
) -> impl FnOnce(UnknownCodeError) -> NormalizationError {
    move |source| NormalizationError::UnknownCode {
        restaurant_id,
        row,
        source,
    }
}

fn build_record(
    cols: &FrameColumns<'_>,
    row: usize,
    resolver: &CodeResolver,
) -> Result<RestaurantRecord> {
    let id = cols.int(Field::RestaurantId, row)?;
    let country_code = cols.int(Field::CountryCode, row)?;
    let country = resolver
        .resolve_country(country_code)
        .map_err(unknown_code(id, row))?
        .to_string();
    let color_code = cols.text(Field::RatingColor, row)?;
    let rating_color = resolver
        .resolve_rating_color(&color_code)
        .map_err(unknown_code(id, row))?
        .to_string();
    let price_tier = resolver.resolve_price_tier(cols.int(Field::PriceTier, row)?);

    Ok(RestaurantRecord {
        id,
        name: cols.text(Field::RestaurantName, row)?,
        country_code,
        country,
        city: cols.text(Field::City, row)?,
        address: cols.text(Field::Address, row)?,
        locality: cols.text(Field::Locality, row)?,
        locality_verbose: cols.text(Field::LocalityVerbose, row)?,
        longitude: cols.float(Field::Longitude, row)?,
        latitude: cols.float(Field::Latitude, row)?,
        cuisine: cols.text(Field::Cuisine, row)?,
        average_cost_for_two: cols.non_negative(Field::AverageCostForTwo, row)?,
        currency: cols.text(Field::Currency, row)?,
        has_table_booking: cols.flag(Field::HasTableBooking, row)?,
        has_online_delivery: cols.flag(Field::HasOnlineDelivery, row)?,
        is_delivering_now: cols.flag(Field::IsDeliveringNow, row)?,
        price_tier,
        rating: cols.float(Field::Rating, row)?,
        rating_color,
        rating_text: cols.text(Field::RatingText, row)?,
        votes: cols.count(Field::Votes, row)?,
    })
}

/// Builds canonical records from a cleaned frame.
///
/// Fails on the first bad row; no partial set is returned. Identifiers must
/// be unique once exact duplicate rows are gone.
pub fn build_records(df: &DataFrame, resolver: &CodeResolver) -> Result<RecordSet> {
    let cols = FrameColumns::new(df)?;
    let mut seen: HashMap<i64, usize> = HashMap::with_capacity(df.height());
    let mut records = Vec::with_capacity(df.height());

    for row in 0..df.height() {
        let record = build_record(&cols, row, resolver)?;
        if seen.insert(record.id, row).is_some() {
            return Err(SchemaError::DuplicateId { id: record.id, row }.into());
        }
        records.push(record);
    }

    info!(records = records.len(), "Built canonical records");
    Ok(RecordSet::new(records))
}
