//! Joins breathing- and sedation-trial rows on the hospitalization-day key.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use icu_model::{HospitalizationId, SatDayRecord, SatOutcome, SbtDayRecord, TrialDayRecord};

fn empty_row(hospitalization_id: &HospitalizationId, date: NaiveDate) -> TrialDayRecord {
    TrialDayRecord {
        hospitalization_id: hospitalization_id.clone(),
        date,
        hosp_id_day_key: TrialDayRecord::day_key(hospitalization_id, date),
        sbt_eligible: false,
        sbt_done: false,
        extub_1st: false,
        success_extub: false,
        fail_extub: false,
        trach_1st: false,
        sbt_first_dttm: None,
        sat_eligible: false,
        sat_complete_cessation: false,
        sat_sedative_cessation: false,
        sat_dose_reduction_agitated: false,
        sat_no_change_agitated: false,
        sat_sedated_to_awake: false,
    }
}

/// Outer join; a side missing for a key leaves its flags false.
///
/// Rows come back ordered by hospitalization id, then date.
pub fn merge_trial_rows(sbt: &[SbtDayRecord], sat: &[SatDayRecord]) -> Vec<TrialDayRecord> {
    let mut merged: BTreeMap<(&HospitalizationId, NaiveDate), TrialDayRecord> = BTreeMap::new();

    for row in sbt {
        let entry = merged
            .entry((&row.hospitalization_id, row.date))
            .or_insert_with(|| empty_row(&row.hospitalization_id, row.date));
        entry.sbt_eligible = row.sbt_eligible;
        entry.sbt_done = row.sbt_done;
        entry.extub_1st = row.extub_1st;
        entry.success_extub = row.success_extub;
        entry.fail_extub = row.fail_extub;
        entry.trach_1st = row.trach_1st;
        entry.sbt_first_dttm = row.sbt_first_dttm;
    }

    for row in sat {
        let entry = merged
            .entry((&row.hospitalization_id, row.date))
            .or_insert_with(|| empty_row(&row.hospitalization_id, row.date));
        entry.sat_eligible = row.sat_eligible;
        entry.sat_complete_cessation = row.has_outcome(SatOutcome::CompleteCessation);
        entry.sat_sedative_cessation = row.has_outcome(SatOutcome::SedativeCessation);
        entry.sat_dose_reduction_agitated = row.has_outcome(SatOutcome::DoseReductionAgitated);
        entry.sat_no_change_agitated = row.has_outcome(SatOutcome::NoChangeAgitated);
        entry.sat_sedated_to_awake = row.has_outcome(SatOutcome::SedatedToAwake);
    }

    merged.into_values().collect()
}
