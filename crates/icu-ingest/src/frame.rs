//! Column access over a raw source frame.

use std::collections::HashMap;

use chrono_tz::Tz;
use icu_common::{any_to_flag, any_to_text, parse_f64};
use icu_model::Timestamp;
use polars::prelude::{AnyValue, Column, DataFrame};

use crate::datetime::any_to_timestamp;
use crate::error::{IngestError, Result};

/// A source table with case-insensitive column lookup.
pub(crate) struct TableFrame<'a> {
    table: &'static str,
    df: &'a DataFrame,
    names: HashMap<String, String>,
}

impl<'a> TableFrame<'a> {
    pub(crate) fn new(table: &'static str, df: &'a DataFrame) -> Self {
        let mut names = HashMap::new();
        for name in df.get_column_names_owned() {
            names
                .entry(name.trim().to_ascii_lowercase())
                .or_insert_with(|| name.to_string());
        }
        Self { table, df, names }
    }

    pub(crate) fn height(&self) -> usize {
        self.df.height()
    }

    pub(crate) fn has_any(&self, candidates: &[&str]) -> bool {
        candidates
            .iter()
            .any(|name| self.names.contains_key(&name.to_ascii_lowercase()))
    }

    /// First present column among `candidates` (a name and its aliases).
    pub(crate) fn require(&self, candidates: &[&str]) -> Result<Cells<'a>> {
        self.optional(candidates)?
            .ok_or_else(|| IngestError::Schema {
                table: self.table,
                column: candidates.first().copied().unwrap_or_default().to_string(),
            })
    }

    pub(crate) fn optional(&self, candidates: &[&str]) -> Result<Option<Cells<'a>>> {
        for candidate in candidates {
            if let Some(actual) = self.names.get(&candidate.to_ascii_lowercase()) {
                let column = self.df.column(actual)?;
                return Ok(Some(Cells {
                    table: self.table,
                    name: (*candidate).to_string(),
                    column,
                }));
            }
        }
        Ok(None)
    }
}

/// Typed cell readers for one column.
pub(crate) struct Cells<'a> {
    table: &'static str,
    name: String,
    column: &'a Column,
}

impl Cells<'_> {
    fn get(&self, row: usize) -> AnyValue<'_> {
        self.column.get(row).unwrap_or(AnyValue::Null)
    }

    fn invalid(&self, row: usize, value: String) -> IngestError {
        IngestError::InvalidValue {
            table: self.table,
            column: self.name.clone(),
            row,
            value,
        }
    }

    pub(crate) fn text(&self, row: usize) -> Option<String> {
        any_to_text(self.get(row))
    }

    pub(crate) fn number(&self, row: usize) -> Result<Option<f64>> {
        match self.text(row) {
            None => Ok(None),
            Some(text) => match parse_f64(&text) {
                Some(value) => Ok(Some(value)),
                None => Err(self.invalid(row, text)),
            },
        }
    }

    pub(crate) fn timestamp(&self, row: usize, tz: Tz) -> Result<Option<Timestamp>> {
        any_to_timestamp(self.get(row), tz).map_err(|value| self.invalid(row, value))
    }

    pub(crate) fn flag(&self, row: usize) -> Result<Option<bool>> {
        let value = self.get(row);
        if matches!(value, AnyValue::Null) {
            return Ok(None);
        }
        match any_to_flag(value) {
            Some(flag) => Ok(Some(flag)),
            None => match self.text(row) {
                None => Ok(None),
                Some(text) => Err(self.invalid(row, text)),
            },
        }
    }
}
