//! Raw snapshot ingestion.
//!
//! Loads the restaurant listing CSV into a Polars `DataFrame` whose columns
//! are all text, and provides the cell conversion helpers the cleaning stage
//! uses to type values.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use dine_ingest::read_snapshot;
//!
//! let df = read_snapshot(Path::new("data/zomato.csv"))?;
//! println!("{} raw rows", df.height());
//! ```

mod cells;
mod error;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, frame_from_rows,
    read_snapshot, validate_dataframe_shape, validate_encoding,
};

// === Cell Conversion ===
pub use cells::{
    cell, cell_bool, cell_f64, cell_i64, cell_text, is_missing, parse_f64, parse_i64,
};
