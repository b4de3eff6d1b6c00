//! Polars `AnyValue` cell conversion.

use polars::prelude::*;

/// Text markers that exported clinical tables use for an empty cell.
const MISSING_MARKERS: [&str; 5] = ["na", "nan", "null", "none", "nat"];

/// Returns true for empty cells and the usual export markers (`NA`, `NaN`, ...).
pub fn is_missing_text(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// Converts a cell to trimmed text, `None` when the cell is missing.
///
/// Integer ids stored as floats (`1001.0`) come back as `"1001"`.
///
/// ```
/// use polars::prelude::AnyValue;
/// use icu_common::any_to_text;
///
/// assert_eq!(any_to_text(AnyValue::Null), None);
/// assert_eq!(any_to_text(AnyValue::String(" MICU ")), Some("MICU".to_string()));
/// assert_eq!(any_to_text(AnyValue::Float64(1001.0)), Some("1001".to_string()));
/// ```
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) if v.is_nan() => return None,
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) if v.is_nan() => return None,
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::Boolean(b) => b.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    };
    if is_missing_text(&text) {
        None
    } else {
        Some(text.trim().to_string())
    }
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Parses a number, `None` for missing or unparseable text.
pub fn parse_f64(value: &str) -> Option<f64> {
    if is_missing_text(value) {
        return None;
    }
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a yes/no flag written as a boolean, 0/1 or Y/N.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "t" | "y" | "yes" => Some(true),
        "0" | "0.0" | "false" | "f" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// Converts a cell to a flag; missing cells are `None`.
pub fn any_to_flag(value: AnyValue<'_>) -> Option<bool> {
    match value {
        AnyValue::Boolean(b) => Some(b),
        other => any_to_text(other).and_then(|text| parse_flag(&text)),
    }
}
