//! Reporting-period summary shown on the quality report.

use chrono::NaiveDate;
use serde::Serialize;

use crate::metric::{Metric, Rate};
use crate::records::LpvModeRow;

/// Unit census and flow totals over the reporting period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CensusTotals {
    pub days: usize,
    pub total_admissions: usize,
    /// Mean of the daily 7AM census.
    pub daily_census: Metric,
    pub mean_census_7pm: Metric,
    pub total_discharges: usize,
    pub floor_transfers: usize,
    pub deaths_in_icu: usize,
    pub discharges_to_hospice: usize,
    pub discharges_to_facility: usize,
    /// Mean 7AM census as a percentage of configured beds.
    pub bed_strain_pct: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatSummary {
    pub eligible_days: usize,
    pub complete_cessation: Rate,
    pub sedative_cessation: Rate,
    pub dose_reduction: Rate,
    pub no_change_agitated: Rate,
    pub sedated_to_awake: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SbtSummary {
    pub eligible_days: usize,
    pub pressure_support_trial: Rate,
    pub successful_extubation: Rate,
    pub failed_extubation: Rate,
    pub first_extubations: usize,
    pub tracheostomies: usize,
}

/// Lung-protective ventilation adherence over controlled-mode records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LpvSummary {
    /// Every controlled-mode IMV record, valid or not.
    pub total_controlled_mode_rows: usize,
    /// Records with ideal body weight and set tidal volume available.
    pub rows_with_valid_data: usize,
    pub low_tv_rows: usize,
    pub low_tv_percentage: Metric,
    pub median_ml_per_kg: Metric,
    pub by_mode: Vec<LpvModeRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualitySummary {
    pub site_name: String,
    pub location_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub census: CensusTotals,
    pub trial_days: usize,
    pub hospitalizations: usize,
    pub sat: SatSummary,
    pub sbt: SbtSummary,
    pub lpv: LpvSummary,
}
