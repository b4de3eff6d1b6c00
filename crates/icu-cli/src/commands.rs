use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;
use icu_cli::pipeline::{ReportRequest, run_report};
use icu_core::QualityReport;
use icu_ingest::list_icu_locations;
use icu_model::SiteConfig;
use icu_report::{OutputPaths, write_report};
use tracing::info;

use crate::cli::{LocationsArgs, ReportArgs};
use crate::summary::apply_table_style;

/// A finished run and where its files went.
pub struct ReportOutcome {
    pub report: QualityReport,
    pub output_dir: PathBuf,
    /// `None` for dry runs.
    pub paths: Option<OutputPaths>,
}

fn load_config(path: &std::path::Path) -> Result<SiteConfig> {
    SiteConfig::load(path).with_context(|| format!("load site configuration {}", path.display()))
}

pub fn run_report_command(args: &ReportArgs) -> Result<ReportOutcome> {
    let config = load_config(&args.config)?;
    let request = ReportRequest {
        unit: args.unit.clone(),
        start: args.start,
        end: args.end,
    };
    let report = run_report(&config, &request)?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("output"));
    let paths = if args.dry_run {
        info!("dry run, no files written");
        None
    } else {
        let paths = write_report(&output_dir, &config.site_key(), &report)
            .with_context(|| format!("write outputs to {}", output_dir.display()))?;
        Some(paths)
    };
    Ok(ReportOutcome {
        report,
        output_dir,
        paths,
    })
}

pub fn run_locations(args: &LocationsArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let locations = list_icu_locations(&config).context("read ADT table")?;
    let mut table = Table::new();
    table.set_header(vec!["ICU location"]);
    apply_table_style(&mut table);
    for location in &locations {
        table.add_row(vec![location.as_str()]);
    }
    println!("{table}");
    if locations.is_empty() {
        eprintln!("No ICU locations found in ADT.");
    }
    Ok(())
}
