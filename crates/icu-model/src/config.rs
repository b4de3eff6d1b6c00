//! Site configuration loaded from `config.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Source table file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    Csv,
    Parquet,
}

impl FileType {
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Csv => "csv",
            FileType::Parquet => "parquet",
        }
    }
}

fn default_anchor_hour() -> u32 {
    7
}

fn default_snapshot_hours() -> [u32; 2] {
    [7, 19]
}

fn default_lookahead_hours() -> u32 {
    24
}

/// Site-level settings shared by loading and reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site_name: String,
    #[serde(alias = "tables_path")]
    pub data_directory: PathBuf,
    #[serde(alias = "filetype", default)]
    pub file_type: FileType,
    /// IANA timezone name, e.g. `America/Chicago`.
    pub timezone: String,
    /// Processed respiratory support table; defaults to the data directory.
    #[serde(default)]
    pub respiratory_support_path: Option<PathBuf>,
    #[serde(default = "default_anchor_hour")]
    pub anchor_hour: u32,
    #[serde(default = "default_snapshot_hours")]
    pub snapshot_hours: [u32; 2],
    #[serde(default = "default_lookahead_hours")]
    pub transfer_lookahead_hours: u32,
    /// Staffed beds per location name, for bed strain.
    #[serde(default)]
    pub bed_capacity: BTreeMap<String, u32>,
}

impl SiteConfig {
    /// Read and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: SiteConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        self.report_options().validate()
    }

    /// Parsed site timezone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| ModelError::UnknownTimezone(self.timezone.clone()))
    }

    /// Lowercased site name, used as the output file prefix.
    pub fn site_key(&self) -> String {
        self.site_name.trim().to_lowercase()
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            anchor_hour: self.anchor_hour,
            snapshot_hours: self.snapshot_hours,
            transfer_lookahead_hours: self.transfer_lookahead_hours,
        }
    }

    pub fn bed_capacity_for(&self, location_name: &str) -> Option<u32> {
        self.bed_capacity.get(location_name).copied()
    }
}

/// Day-window and join settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub anchor_hour: u32,
    /// The morning and evening census instants.
    pub snapshot_hours: [u32; 2],
    pub transfer_lookahead_hours: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            anchor_hour: default_anchor_hour(),
            snapshot_hours: default_snapshot_hours(),
            transfer_lookahead_hours: default_lookahead_hours(),
        }
    }
}

impl ReportOptions {
    pub fn validate(&self) -> Result<()> {
        check_hour("anchor_hour", self.anchor_hour)?;
        for hour in self.snapshot_hours {
            check_hour("snapshot_hours", hour)?;
        }
        Ok(())
    }
}

fn check_hour(field: &'static str, value: u32) -> Result<()> {
    if value > 23 {
        return Err(ModelError::InvalidHour { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_accepts_legacy_keys() {
        let json = r#"{
            "site_name": "UCMC",
            "tables_path": "/data/clif",
            "filetype": "parquet",
            "timezone": "America/Chicago"
        }"#;
        let config: SiteConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.file_type, FileType::Parquet);
        assert_eq!(config.data_directory, PathBuf::from("/data/clif"));
        assert_eq!(config.report_options(), ReportOptions::default());
        assert_eq!(config.site_key(), "ucmc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_unknown_timezone() {
        let json = r#"{
            "site_name": "x",
            "data_directory": ".",
            "timezone": "Mars/Olympus"
        }"#;
        let config: SiteConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ModelError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn test_options_reject_bad_hour() {
        let options = ReportOptions {
            anchor_hour: 24,
            ..ReportOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ModelError::InvalidHour {
                field: "anchor_hour",
                value: 24
            })
        ));
    }
}
