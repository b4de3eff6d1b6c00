//! Writers for engine outputs.
//!
//! One run produces four files in the output directory:
//!
//! - `<site>_daily_metrics.csv`: census and flow per day
//! - `<site>_trial_days.csv`: SBT and SAT flags per hospitalization-day
//! - `<site>_lpv_by_mode.csv`: low-tidal-volume counts per ventilator mode
//! - `<site>_quality_summary.json`: period summary

pub mod error;
pub mod paths;
pub mod tables;

use std::fs;
use std::path::Path;

use icu_core::QualityReport;
use tracing::{info, info_span};

pub use error::{ReportError, Result};
pub use paths::OutputPaths;
pub use tables::{to_csv_string, write_csv, write_csv_file, write_json_file};

/// Writes every output of `report` and returns where they went.
pub fn write_report(output_dir: &Path, site_key: &str, report: &QualityReport) -> Result<OutputPaths> {
    let span = info_span!("write", dir = %output_dir.display());
    let _guard = span.enter();

    fs::create_dir_all(output_dir).map_err(|source| ReportError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let paths = OutputPaths::new(output_dir, site_key);

    write_csv_file(&paths.daily_metrics, &report.daily)?;
    write_csv_file(&paths.trial_days, &report.trial_days)?;
    write_csv_file(&paths.lpv_by_mode, &report.lpv.by_mode)?;
    write_json_file(&paths.summary, &report.summary)?;

    info!(
        daily_rows = report.daily.len(),
        trial_rows = report.trial_days.len(),
        lpv_modes = report.lpv.by_mode.len(),
        "outputs written"
    );
    Ok(paths)
}
