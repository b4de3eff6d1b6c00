//! Output file naming.

use std::path::{Path, PathBuf};

/// Files written for one site, all prefixed with the site key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub daily_metrics: PathBuf,
    pub trial_days: PathBuf,
    pub lpv_by_mode: PathBuf,
    pub summary: PathBuf,
}

impl OutputPaths {
    pub fn new(output_dir: &Path, site_key: &str) -> Self {
        let file = |suffix: &str| output_dir.join(format!("{site_key}_{suffix}"));
        Self {
            daily_metrics: file("daily_metrics.csv"),
            trial_days: file("trial_days.csv"),
            lpv_by_mode: file("lpv_by_mode.csv"),
            summary: file("quality_summary.json"),
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            &self.daily_metrics,
            &self.trial_days,
            &self.lpv_by_mode,
            &self.summary,
        ]
    }
}
