//! Shared utilities for the ICU quality crates.
//!
//! Source tables arrive from CSV and Parquet with inconsistent cell types;
//! the helpers here normalize a Polars cell to text, numbers and flags.

pub mod polars;

pub use polars::{any_to_flag, any_to_text, format_numeric, is_missing_text, parse_f64, parse_flag};
