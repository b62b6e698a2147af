//! Reading the sample snapshot end to end.

use std::path::PathBuf;

use dine_ingest::{cell, cell_bool, cell_f64, cell_i64, cell_text, read_snapshot};
use polars::prelude::DataType;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata/zomato_sample.csv")
}

#[test]
fn sample_snapshot_loads_as_text() {
    let df = read_snapshot(&sample_path()).unwrap();

    assert_eq!(df.height(), 14);
    assert_eq!(df.width(), 21);
    for column in df.get_columns() {
        assert_eq!(column.dtype(), &DataType::String, "{}", column.name());
    }
}

#[test]
fn sample_cells_convert_to_typed_values() {
    let df = read_snapshot(&sample_path()).unwrap();

    let cuisines = cell(&df, "Cuisines", 0).unwrap();
    assert_eq!(
        cell_text(&cuisines).as_deref(),
        Some("French, Japanese, Desserts")
    );
    let id = cell(&df, "Restaurant ID", 0).unwrap();
    assert_eq!(cell_i64(&id), Some(6_317_637));
    let rating = cell(&df, "Aggregate rating", 0).unwrap();
    assert_eq!(cell_f64(&rating), Some(4.8));
    let booking = cell(&df, "Has Table booking", 0).unwrap();
    assert_eq!(cell_bool(&booking), Some(true));
}

#[test]
fn unknown_column_is_a_polars_error() {
    let df = read_snapshot(&sample_path()).unwrap();
    assert!(cell(&df, "Michelin Stars", 0).is_err());
}
