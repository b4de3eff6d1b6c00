//! Row-oriented CSV output.
//!
//! The header comes from [`Columns`], so empty tables still name their columns.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use icu_model::Columns;
use serde::Serialize;

use crate::error::{ReportError, Result};

/// Writes `rows` as CSV with a header line.
pub fn write_csv<W: Write, T: Serialize + Columns>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(T::COLUMNS)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Renders `rows` to a CSV string.
pub fn to_csv_string<T: Serialize + Columns>(rows: &[T]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows)?;
    String::from_utf8(buffer).map_err(|err| ReportError::Io(std::io::Error::other(err)))
}

pub fn write_csv_file<T: Serialize + Columns>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(BufWriter::new(file), rows)
}

/// Pretty-printed JSON.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
