//! Displayed metric values with an explicit "not applicable" marker.
//!
//! Any average or percentage over an empty denominator becomes
//! [`Metric::NotApplicable`] instead of NaN.

use std::fmt;

use serde::{Serialize, Serializer};

/// Marker rendered for metrics without a denominator.
pub const NOT_APPLICABLE: &str = "N/A";

/// A displayed value rounded to one decimal, or `N/A`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    NotApplicable,
}

impl Metric {
    /// `100 * numerator / denominator`, rounded to one decimal.
    pub fn percentage(numerator: usize, denominator: usize) -> Self {
        if denominator == 0 {
            return Metric::NotApplicable;
        }
        Metric::Value(round1(100.0 * numerator as f64 / denominator as f64))
    }

    /// Arithmetic mean, rounded to one decimal.
    pub fn mean(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sum = 0.0;
        let mut count = 0usize;
        for value in values {
            sum += value;
            count += 1;
        }
        if count == 0 {
            return Metric::NotApplicable;
        }
        Metric::Value(round1(sum / count as f64))
    }

    /// Median of the values, rounded to one decimal.
    pub fn median(values: &[f64]) -> Self {
        if values.is_empty() {
            return Metric::NotApplicable;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };
        Metric::Value(round1(median))
    }

    /// Wraps a raw value, mapping non-finite input to `N/A`.
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Metric::Value(round1(value))
        } else {
            Metric::NotApplicable
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(value) => Some(*value),
            Metric::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Metric::Value(_))
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(value) => write!(f, "{value:.1}"),
            Metric::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(value) => serializer.serialize_f64(*value),
            Metric::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

/// A count over a denominator, e.g. trial days over eligible days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rate {
    pub numerator: usize,
    pub denominator: usize,
}

impl Rate {
    pub fn new(numerator: usize, denominator: usize) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn percentage(&self) -> Metric {
        Metric::percentage(self.numerator, self.denominator)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percentage() {
            Metric::Value(pct) => write!(f, "{pct:.1}% ({}/{})", self.numerator, self.denominator),
            Metric::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}
