//! Timestamp parsing and localization in the site timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use icu_common::any_to_text;
use icu_model::{Timestamp, localize};
use polars::prelude::{AnyValue, TimeUnit};

/// Naive layouts accepted for wall-clock timestamps.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Layouts carrying an explicit UTC offset.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Parses a timestamp string; `None` when no accepted layout matches.
///
/// Values with an offset (or a trailing `Z`) are converted to `tz`; naive
/// values and bare dates are read as wall-clock time in `tz`.
pub fn parse_timestamp(text: &str, tz: Tz) -> Option<Timestamp> {
    let trimmed = text.trim();
    if let Ok(fixed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(fixed.with_timezone(&tz));
    }
    let normalized = normalize_utc_suffix(trimmed);
    for format in OFFSET_FORMATS {
        if let Ok(fixed) = DateTime::parse_from_str(&normalized, format) {
            return Some(fixed.with_timezone(&tz));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(localize(naive, tz));
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| localize(naive, tz))
}

fn normalize_utc_suffix(text: &str) -> String {
    for suffix in ["Z", " UTC", "UTC"] {
        if let Some(stripped) = text.strip_suffix(suffix) {
            return format!("{}+00:00", stripped.trim_end());
        }
    }
    text.to_string()
}

/// Converts a cell to a timestamp.
///
/// Returns `Ok(None)` for missing cells and `Err(text)` with the raw cell text
/// when a present value cannot be read.
pub fn any_to_timestamp(value: AnyValue<'_>, tz: Tz) -> Result<Option<Timestamp>, String> {
    match value {
        AnyValue::Datetime(raw, unit, zone) => {
            let utc = epoch_to_utc(raw, unit).ok_or_else(|| raw.to_string())?;
            if zone.is_some() {
                Ok(Some(utc.with_timezone(&tz)))
            } else {
                Ok(Some(localize(utc.naive_utc(), tz)))
            }
        }
        other => match any_to_text(other) {
            None => Ok(None),
            Some(text) => parse_timestamp(&text, tz).map(Some).ok_or(text),
        },
    }
}

fn epoch_to_utc(raw: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(raw)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(raw),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(raw),
    }
}
