//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use icu_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "icu-quality",
    version,
    about = "ICU quality metrics - census, patient flow and ventilation trials",
    long_about = "Compute day-level ICU quality metrics from a site's source tables.\n\n\
                  Reports unit census at 7AM and 7PM, admissions, discharges, floor\n\
                  transfers, discharge outcomes, SAT/SBT delivery and lung-protective\n\
                  ventilation adherence."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute metrics for one unit over a reporting period.
    Report(ReportArgs),

    /// List ICU location names found in the ADT table.
    Locations(LocationsArgs),
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Site configuration JSON.
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// ADT location name of the unit, matched exactly.
    #[arg(long = "unit", value_name = "NAME")]
    pub unit: String,

    /// First reporting day (YYYY-MM-DD).
    #[arg(long = "start", value_name = "DATE")]
    pub start: NaiveDate,

    /// Last reporting day, inclusive (YYYY-MM-DD).
    #[arg(long = "end", value_name = "DATE")]
    pub end: NaiveDate,

    /// Output directory for generated files (default: ./output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Compute and print the summary without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct LocationsArgs {
    /// Site configuration JSON.
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
