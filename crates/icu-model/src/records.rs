//! Per-day output rows.
//!
//! Serialized field names follow the unit dashboard's column names so any
//! tabular writer can emit them directly.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::ids::HospitalizationId;

/// Ordered column names of a record written as a table row.
///
/// Matches the serialized field names, so a table with no rows still carries
/// its header.
pub trait Columns {
    const COLUMNS: &'static [&'static str];
}

/// Census and flow counts for one unit on one day-window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyMetricsRecord {
    pub location_name: String,
    #[serde(rename = "day")]
    pub date: NaiveDate,
    #[serde(rename = "total_admissions")]
    pub admissions: usize,
    #[serde(rename = "census_7AM")]
    pub census_7am: usize,
    #[serde(rename = "census_7PM")]
    pub census_7pm: usize,
    #[serde(rename = "total_discharges")]
    pub discharges: usize,
    pub floor_transfers: usize,
    #[serde(rename = "deaths_in_icu")]
    pub deaths: usize,
    #[serde(rename = "discharges_to_hospice")]
    pub hospice: usize,
    #[serde(rename = "discharges_to_facility")]
    pub facility: usize,
}

impl Columns for DailyMetricsRecord {
    const COLUMNS: &'static [&'static str] = &[
        "location_name",
        "day",
        "total_admissions",
        "census_7AM",
        "census_7PM",
        "total_discharges",
        "floor_transfers",
        "deaths_in_icu",
        "discharges_to_hospice",
        "discharges_to_facility",
    ];
}

/// Breathing-trial flags for one hospitalization-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SbtDayRecord {
    pub hospitalization_id: HospitalizationId,
    pub date: NaiveDate,
    pub sbt_eligible: bool,
    pub sbt_done: bool,
    pub extub_1st: bool,
    pub success_extub: bool,
    pub fail_extub: bool,
    pub trach_1st: bool,
    pub sbt_first_dttm: Option<DateTime<FixedOffset>>,
}

/// How a sedation trial was delivered on an eligible day.
///
/// A day carries at most one outcome; the variants are listed in the order
/// they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SatOutcome {
    /// Every sedating infusion stopped for at least 30 minutes.
    CompleteCessation,
    /// Propofol and benzodiazepine infusions stopped; opioids may continue.
    SedativeCessation,
    /// A sedating dose halved while the patient was agitated.
    DoseReductionAgitated,
    /// No dose change despite 45 minutes of agitation.
    NoChangeAgitated,
    /// A sedated score followed by 45 minutes of non-sedated scores.
    SedatedToAwake,
}

impl SatOutcome {
    pub const ALL: [SatOutcome; 5] = [
        SatOutcome::CompleteCessation,
        SatOutcome::SedativeCessation,
        SatOutcome::DoseReductionAgitated,
        SatOutcome::NoChangeAgitated,
        SatOutcome::SedatedToAwake,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SatOutcome::CompleteCessation => "complete_cessation",
            SatOutcome::SedativeCessation => "sedative_cessation",
            SatOutcome::DoseReductionAgitated => "dose_reduction_agitated",
            SatOutcome::NoChangeAgitated => "no_change_agitated",
            SatOutcome::SedatedToAwake => "sedated_to_awake",
        }
    }
}

/// Sedation-trial eligibility and outcome for one hospitalization-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SatDayRecord {
    pub hospitalization_id: HospitalizationId,
    pub date: NaiveDate,
    pub sat_eligible: bool,
    pub outcome: Option<SatOutcome>,
}

impl SatDayRecord {
    pub fn has_outcome(&self, outcome: SatOutcome) -> bool {
        self.outcome == Some(outcome)
    }
}

/// Breathing- and sedation-trial flags merged on the hospitalization-day key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialDayRecord {
    pub hospitalization_id: HospitalizationId,
    #[serde(rename = "event_date")]
    pub date: NaiveDate,
    pub hosp_id_day_key: String,
    pub sbt_eligible: bool,
    pub sbt_done: bool,
    pub extub_1st: bool,
    pub success_extub: bool,
    pub fail_extub: bool,
    pub trach_1st: bool,
    pub sbt_first_dttm: Option<DateTime<FixedOffset>>,
    pub sat_eligible: bool,
    pub sat_complete_cessation: bool,
    pub sat_sedative_cessation: bool,
    pub sat_dose_reduction_agitated: bool,
    pub sat_no_change_agitated: bool,
    pub sat_sedated_to_awake: bool,
}

impl Columns for TrialDayRecord {
    const COLUMNS: &'static [&'static str] = &[
        "hospitalization_id",
        "event_date",
        "hosp_id_day_key",
        "sbt_eligible",
        "sbt_done",
        "extub_1st",
        "success_extub",
        "fail_extub",
        "trach_1st",
        "sbt_first_dttm",
        "sat_eligible",
        "sat_complete_cessation",
        "sat_sedative_cessation",
        "sat_dose_reduction_agitated",
        "sat_no_change_agitated",
        "sat_sedated_to_awake",
    ];
}

impl TrialDayRecord {
    /// `<hospitalization_id>_<YYYY-MM-DD>`.
    pub fn day_key(hospitalization_id: &HospitalizationId, date: NaiveDate) -> String {
        format!("{hospitalization_id}_{date}")
    }

    /// The single SAT outcome carried by this row, if any.
    pub fn sat_outcome(&self) -> Option<SatOutcome> {
        let flags = [
            (self.sat_complete_cessation, SatOutcome::CompleteCessation),
            (self.sat_sedative_cessation, SatOutcome::SedativeCessation),
            (self.sat_dose_reduction_agitated, SatOutcome::DoseReductionAgitated),
            (self.sat_no_change_agitated, SatOutcome::NoChangeAgitated),
            (self.sat_sedated_to_awake, SatOutcome::SedatedToAwake),
        ];
        flags
            .into_iter()
            .find_map(|(set, outcome)| set.then_some(outcome))
    }
}

/// Low-tidal-volume counts for one ventilator mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LpvModeRow {
    pub mode_category: String,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub low_tv_rows: usize,
    pub low_tv_pct: crate::Metric,
}

impl Columns for LpvModeRow {
    const COLUMNS: &'static [&'static str] = &[
        "mode_category",
        "total_rows",
        "valid_rows",
        "low_tv_rows",
        "low_tv_pct",
    ];
}
