//! Polars `AnyValue` conversions and column extraction.
//!
//! Transforms read columns cell by cell into plain Rust vectors, so each
//! operation can report exactly which row and value failed to convert.

use polars::prelude::{AnyValue, Column, DataFrame, NamedFrom};
use tollgrid_model::Key;

use crate::error::{Result, TransformError};

/// Looks up a column, mapping absence to [`TransformError::MissingColumn`].
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| TransformError::MissingColumn {
        column: name.to_string(),
    })
}

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null` and formats floats without trailing zeros.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use tollgrid_transform::values::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(9.70), "9.7");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts a cell to a [`Key`], returning `None` for nulls and blanks.
///
/// Strings that read as integers become [`Key::Int`] so that ids stored as
/// text compare equal to ids stored as numbers.
pub fn any_to_key(value: AnyValue<'_>) -> Option<Key> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(Key::Int(i64::from(v))),
        AnyValue::Int16(v) => Some(Key::Int(i64::from(v))),
        AnyValue::Int32(v) => Some(Key::Int(i64::from(v))),
        AnyValue::Int64(v) => Some(Key::Int(v)),
        AnyValue::UInt8(v) => Some(Key::Int(i64::from(v))),
        AnyValue::UInt16(v) => Some(Key::Int(i64::from(v))),
        AnyValue::UInt32(v) => Some(Key::Int(i64::from(v))),
        AnyValue::UInt64(v) => Some(match i64::try_from(v) {
            Ok(v) => Key::Int(v),
            Err(_) => Key::Text(v.to_string()),
        }),
        AnyValue::Float32(v) => float_key(f64::from(v)),
        AnyValue::Float64(v) => float_key(v),
        AnyValue::String(s) => text_key(s),
        AnyValue::StringOwned(s) => text_key(s.as_str()),
        other => Some(Key::Text(other.to_string())),
    }
}

fn float_key(value: f64) -> Option<Key> {
    if value.is_nan() {
        None
    } else {
        Some(Key::from_f64(value))
    }
}

fn text_key(value: &str) -> Option<Key> {
    if value.trim().is_empty() {
        None
    } else {
        Some(Key::parse(value))
    }
}

/// Converts a cell to `f64`.
///
/// Nulls, NaN and blank strings are `Ok(None)`; anything else that is not a
/// number is a [`TransformError::ParseFailure`].
pub fn numeric_cell(column: &str, row: usize, value: AnyValue<'_>) -> Result<Option<f64>> {
    let parse_failure = |value: String| TransformError::ParseFailure {
        column: column.to_string(),
        row,
        value,
        expected: "number",
    };
    let number = match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s).map_err(|_| parse_failure(s.to_string()))?,
        AnyValue::StringOwned(s) => {
            parse_f64(s.as_str()).map_err(|_| parse_failure(s.to_string()))?
        }
        other => return Err(parse_failure(other.to_string())),
    };
    Ok(number.filter(|v| !v.is_nan()))
}

/// Parses a string as `f64`; blank strings are `Ok(None)`.
pub fn parse_f64(value: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<f64>().map(Some)
}

/// Reads a column as keys, one entry per row.
pub fn key_column(df: &DataFrame, name: &str) -> Result<Vec<Option<Key>>> {
    let column = require_column(df, name)?;
    let mut keys = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        keys.push(any_to_key(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(keys)
}

/// Reads a column as numbers, one entry per row.
pub fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = require_column(df, name)?;
    let mut numbers = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        numbers.push(numeric_cell(
            name,
            idx,
            column.get(idx).unwrap_or(AnyValue::Null),
        )?);
    }
    Ok(numbers)
}

/// Reads a column as trimmed text; nulls and blanks are `None`.
pub fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = require_column(df, name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
        let trimmed = value.trim();
        values.push(if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        });
    }
    Ok(values)
}

/// Builds a column from keys: `Int64` when every key is an integer,
/// otherwise `String`.
pub fn keys_to_column(name: &str, keys: &[Option<Key>]) -> Column {
    let all_int = keys
        .iter()
        .flatten()
        .all(|key| matches!(key, Key::Int(_)));
    if all_int {
        let values: Vec<Option<i64>> = keys
            .iter()
            .map(|key| key.as_ref().and_then(Key::as_int))
            .collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = keys
            .iter()
            .map(|key| key.as_ref().map(ToString::to_string))
            .collect();
        Column::new(name.into(), values)
    }
}

/// Arithmetic mean that skips missing values.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    /// `None` until at least one value was pushed.
    pub fn value(self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

impl FromIterator<Option<f64>> for RunningMean {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        let mut mean = Self::default();
        for value in iter {
            mean.push(value);
        }
        mean
    }
}
