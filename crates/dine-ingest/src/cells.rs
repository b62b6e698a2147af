//! Cell conversion helpers for Polars `AnyValue`s.
//!
//! Raw snapshots are read as text, but frames handed in by callers may carry
//! typed columns, so every helper accepts both representations.

use polars::prelude::{AnyValue, DataFrame, PolarsResult};

/// Returns the trimmed text of a cell, or `None` when it is null or blank.
pub fn cell_text(value: &AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => v.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        other => other.to_string(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Whether a cell counts as missing (null or blank text).
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(s) => s.trim().is_empty(),
        AnyValue::StringOwned(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Converts a cell to `f64`.
pub fn cell_f64(value: &AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(*v)),
        AnyValue::Int16(v) => Some(f64::from(*v)),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(f64::from(*v)),
        AnyValue::UInt16(v) => Some(f64::from(*v)),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Float64(v) => Some(*v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(s),
        _ => None,
    }
}

/// Converts a cell to `i64`.
///
/// Text such as `"200.0"` is accepted when it holds a whole number; values
/// with a fractional part are rejected rather than truncated.
pub fn cell_i64(value: &AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(*v)),
        AnyValue::Int16(v) => Some(i64::from(*v)),
        AnyValue::Int32(v) => Some(i64::from(*v)),
        AnyValue::Int64(v) => Some(*v),
        AnyValue::UInt8(v) => Some(i64::from(*v)),
        AnyValue::UInt16(v) => Some(i64::from(*v)),
        AnyValue::UInt32(v) => Some(i64::from(*v)),
        AnyValue::UInt64(v) => i64::try_from(*v).ok(),
        AnyValue::Float32(v) => whole_f64(f64::from(*v)),
        AnyValue::Float64(v) => whole_f64(*v),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(s),
        _ => None,
    }
}

/// Converts a `0/1`, `true/false` or `yes/no` cell to a boolean.
pub fn cell_bool(value: &AnyValue<'_>) -> Option<bool> {
    match value {
        AnyValue::Boolean(b) => Some(*b),
        AnyValue::Null => None,
        AnyValue::String(s) => parse_bool(s),
        AnyValue::StringOwned(s) => parse_bool(s),
        other => cell_i64(other).and_then(|v| match v {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }),
    }
}

/// Parses a string to `f64`, returning `None` for blank or invalid input.
pub fn parse_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a string to `i64`, accepting whole-number decimals.
pub fn parse_i64(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| parse_f64(trimmed).and_then(whole_f64))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn whole_f64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        Some(v as i64)
    } else {
        None
    }
}

/// Reads one cell of a named column.
pub fn cell<'a>(df: &'a DataFrame, column: &str, row: usize) -> PolarsResult<AnyValue<'a>> {
    df.column(column)?.get(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_cells_are_trimmed_and_blank_is_missing() {
        assert_eq!(cell_text(&AnyValue::String("  Goa ")), Some("Goa".to_string()));
        assert_eq!(cell_text(&AnyValue::String("   ")), None);
        assert_eq!(cell_text(&AnyValue::Null), None);
        assert_eq!(cell_text(&AnyValue::Int64(30)), Some("30".to_string()));
        assert!(is_missing(&AnyValue::String("")));
        assert!(!is_missing(&AnyValue::Int32(0)));
    }

    #[test]
    fn integers_accept_whole_decimals_only() {
        assert_eq!(cell_i64(&AnyValue::String("200")), Some(200));
        assert_eq!(cell_i64(&AnyValue::String("200.0")), Some(200));
        assert_eq!(cell_i64(&AnyValue::String("4.5")), None);
        assert_eq!(cell_i64(&AnyValue::Float64(3.0)), Some(3));
        assert_eq!(cell_i64(&AnyValue::String("abc")), None);
    }

    #[test]
    fn floats_reject_non_finite() {
        assert_eq!(cell_f64(&AnyValue::String("4.9")), Some(4.9));
        assert_eq!(cell_f64(&AnyValue::String("NaN")), None);
        assert_eq!(cell_f64(&AnyValue::Int32(2)), Some(2.0));
    }

    #[test]
    fn booleans_from_flags() {
        assert_eq!(cell_bool(&AnyValue::String("1")), Some(true));
        assert_eq!(cell_bool(&AnyValue::String("No")), Some(false));
        assert_eq!(cell_bool(&AnyValue::Int64(0)), Some(false));
        assert_eq!(cell_bool(&AnyValue::Int64(2)), None);
        assert_eq!(cell_bool(&AnyValue::Boolean(true)), Some(true));
    }
}
