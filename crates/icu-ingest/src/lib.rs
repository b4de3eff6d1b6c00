//! ICU source table ingestion.
//!
//! This crate loads the site's source tables (CSV or Parquet) into Polars
//! DataFrames and adapts them into the typed, timezone-localized events the
//! engine consumes.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use icu_model::SiteConfig;
//! use icu_ingest::load_event_tables;
//!
//! let config = SiteConfig::load(Path::new("config/config.json"))?;
//! let tables = load_event_tables(&config)?;
//! println!("{} stay intervals", tables.stays.len());
//! ```

mod adapter;
mod datetime;
mod error;
mod frame;
mod loader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Adapter ===
pub use adapter::{
    RawTables, TableKind, adapt_assessments, adapt_code_statuses, adapt_hospitalizations,
    adapt_medications, adapt_patients, adapt_respiratory, adapt_stays, adapt_tables, adapt_vitals,
    icu_location_names, validate_schema,
};

// === Timestamps ===
pub use datetime::{any_to_timestamp, parse_timestamp};

// === Loading ===
pub use loader::{list_icu_locations, load_event_tables, load_raw_tables, read_table, table_path};
