use std::path::PathBuf;

use thiserror::Error;

use crate::lookup::describe_path;

/// Errors raised while loading or validating lookup tables.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to read lookup tables {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse lookup tables {}: {source}", describe_path(.path.as_ref()))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
    #[error("lookup table '{table}' has an empty label for code '{code}'")]
    EmptyLabel { table: &'static str, code: String },
}

pub type Result<T> = std::result::Result<T, LookupError>;
