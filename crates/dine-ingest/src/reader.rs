//! Snapshot reading.
//!
//! Every raw column is read as text. Typing happens later, cell by cell, when
//! canonical records are built, so a stray non-numeric value surfaces as a
//! schema error that names the column and row instead of a CSV inference
//! failure.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::{
    Column, CsvReadOptions, DataFrame, IntoColumn, NamedFrom, SerReader, Series,
};

use crate::error::{IngestError, Result};

/// Maximum file size for snapshot loading (500 MB).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

fn open_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Check file size against the default limit.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Rejects UTF-16 files; UTF-8 with or without BOM is accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

/// Validate the frame shape after loading.
pub fn validate_dataframe_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.height() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    for name in df.get_column_names() {
        if name.trim().is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Reads a raw snapshot into a DataFrame of text columns.
///
/// Empty CSV fields become nulls.
pub fn read_snapshot(path: &Path) -> Result<DataFrame> {
    check_file_size(path)?;
    validate_encoding(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    validate_dataframe_shape(&df, path)?;
    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded raw snapshot"
    );
    Ok(df)
}

/// Builds a text frame from in-memory rows.
///
/// `None` cells become nulls, matching what [`read_snapshot`] produces for
/// empty CSV fields. Every row must have one cell per header.
pub fn frame_from_rows(headers: &[&str], rows: &[Vec<Option<&str>>]) -> Result<DataFrame> {
    for (idx, row) in rows.iter().enumerate() {
        if row.len() != headers.len() {
            return Err(IngestError::RowWidth {
                row: idx,
                found: row.len(),
                expected: headers.len(),
            });
        }
    }
    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(col_idx, name)| {
            let values: Vec<Option<&str>> = rows.iter().map(|row| row[col_idx]).collect();
            Series::new((*name).into(), values).into_column()
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}
