//! Table file discovery and reading.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use icu_model::{EventTables, FileType, SiteConfig};
use polars::prelude::*;
use tracing::{debug, info, info_span};

use crate::adapter::{RawTables, TableKind, adapt_tables, icu_location_names};
use crate::error::{IngestError, Result};

/// Resolves the file for `kind` under the configured data directory.
///
/// The respiratory table may point at a separately processed file.
pub fn table_path(config: &SiteConfig, kind: TableKind) -> PathBuf {
    if kind == TableKind::RespiratorySupport
        && let Some(path) = &config.respiratory_support_path
    {
        return path.clone();
    }
    config.data_directory.join(format!(
        "clif_{}.{}",
        kind.name(),
        config.file_type.extension()
    ))
}

/// Reads one table file into a DataFrame.
///
/// CSV columns are read as text so the adapter decides every type.
pub fn read_table(path: &Path, file_type: FileType) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let df = match file_type {
        FileType::Csv => read_csv(path)?,
        FileType::Parquet => read_parquet(path)?,
    };
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "table read"
    );
    Ok(df)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
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
        })
}

fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| IngestError::ParquetRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn read_kind(config: &SiteConfig, kind: TableKind) -> Result<DataFrame> {
    let path = table_path(config, kind);
    let file_type = file_type_for(&path, config.file_type);
    read_table(&path, file_type)
}

/// An override path's own extension wins over the configured file type.
fn file_type_for(path: &Path, configured: FileType) -> FileType {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("parquet") => FileType::Parquet,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => FileType::Csv,
        _ => configured,
    }
}

/// Reads every source table named by the configuration.
pub fn load_raw_tables(config: &SiteConfig) -> Result<RawTables> {
    let span = info_span!("load", site = %config.site_name);
    let _guard = span.enter();
    let start = Instant::now();

    let tables = RawTables {
        adt: read_kind(config, TableKind::Adt)?,
        hospitalization: read_kind(config, TableKind::Hospitalization)?,
        patient: read_kind(config, TableKind::Patient)?,
        medication_admin_continuous: read_kind(config, TableKind::MedicationAdminContinuous)?,
        patient_assessments: read_kind(config, TableKind::PatientAssessments)?,
        code_status: read_kind(config, TableKind::CodeStatus)?,
        vitals: read_kind(config, TableKind::Vitals)?,
        respiratory_support: read_kind(config, TableKind::RespiratorySupport)?,
    };

    info!(
        data_directory = %config.data_directory.display(),
        duration_ms = start.elapsed().as_millis(),
        "load complete"
    );
    Ok(tables)
}

/// Loads and adapts every table in the site timezone.
pub fn load_event_tables(config: &SiteConfig) -> Result<EventTables> {
    let tz = config.tz()?;
    let raw = load_raw_tables(config)?;
    adapt_tables(&raw, tz)
}

/// ICU location names present in the site's ADT table.
pub fn list_icu_locations(config: &SiteConfig) -> Result<Vec<String>> {
    let df = read_kind(config, TableKind::Adt)?;
    icu_location_names(&df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_for_override() {
        assert_eq!(
            file_type_for(Path::new("/tmp/resp.parquet"), FileType::Csv),
            FileType::Parquet
        );
        assert_eq!(
            file_type_for(Path::new("/tmp/resp.CSV"), FileType::Parquet),
            FileType::Csv
        );
        assert_eq!(
            file_type_for(Path::new("/tmp/resp"), FileType::Parquet),
            FileType::Parquet
        );
    }
}
