//! Breathing, sedation and lung-protective ventilation tests.

mod common;

use common::*;
use icu_core::trials::{self, lpv};
use icu_core::{EventIndex, LpvRecord, QualityEngine, ReportContext, ideal_body_weight};
use icu_model::{
    CodeStatusCategory, DeviceCategory, DischargeCategory, EventTables, Medication, Metric,
    ModeCategory, SatOutcome, SbtDayRecord, SexCategory,
};

/// Ventilated, sedated ICU patient at the Jan 1 morning snapshot.
fn sedated_patient() -> EventTables {
    EventTables {
        stays: vec![icu_stay(0, "H1", at(1, 1, 0, 0), None)],
        hospitalizations: vec![hospitalization("H1", None, None)],
        respiratory: vec![controlled("H1", at(1, 1, 6, 0))],
        medications: vec![dose("H1", at(1, 1, 6, 0), Medication::Propofol, 20.0)],
        ..EventTables::default()
    }
}

fn sat_day(tables: &EventTables) -> (bool, Option<SatOutcome>) {
    let index = EventIndex::build(tables);
    let rows = trials::evaluate(&index, &windows(date(1, 1), date(1, 1)));
    assert_eq!(rows.sat.len(), 1);
    (rows.sat[0].sat_eligible, rows.sat[0].outcome)
}

fn sbt_days(tables: &EventTables, last_day: u32) -> Vec<SbtDayRecord> {
    let index = EventIndex::build(tables);
    trials::evaluate(&index, &windows(date(1, 1), date(1, last_day))).sbt
}

#[test]
fn test_sat_complete_cessation() {
    let mut tables = sedated_patient();
    tables
        .medications
        .push(dose("H1", at(1, 1, 10, 0), Medication::Propofol, 0.0));
    assert_eq!(sat_day(&tables), (true, Some(SatOutcome::CompleteCessation)));
}

#[test]
fn test_sat_restart_within_grace_is_not_cessation() {
    let mut tables = sedated_patient();
    tables.medications.extend([
        dose("H1", at(1, 1, 10, 0), Medication::Propofol, 0.0),
        dose("H1", at(1, 1, 10, 20), Medication::Propofol, 20.0),
    ]);
    assert_eq!(sat_day(&tables), (true, None));
}

#[test]
fn test_sat_sedative_cessation_with_opioid_running() {
    let mut tables = sedated_patient();
    tables.medications.extend([
        dose("H1", at(1, 1, 6, 0), Medication::Fentanyl, 50.0),
        dose("H1", at(1, 1, 10, 0), Medication::Propofol, 0.0),
    ]);
    assert_eq!(sat_day(&tables), (true, Some(SatOutcome::SedativeCessation)));
}

#[test]
fn test_sat_dose_reduction_while_agitated() {
    let mut tables = sedated_patient();
    tables
        .medications
        .push(dose("H1", at(1, 1, 10, 0), Medication::Propofol, 10.0));
    tables.assessments.push(rass("H1", at(1, 1, 9, 50), 2.0));
    assert_eq!(sat_day(&tables), (true, Some(SatOutcome::DoseReductionAgitated)));
}

#[test]
fn test_sat_no_change_while_agitated() {
    let mut tables = sedated_patient();
    tables.assessments.extend([
        rass("H1", at(1, 1, 9, 0), 1.0),
        rass("H1", at(1, 1, 9, 45), 2.0),
    ]);
    assert_eq!(sat_day(&tables), (true, Some(SatOutcome::NoChangeAgitated)));
}

#[test]
fn test_sat_agitation_shorter_than_sustained_span() {
    let mut tables = sedated_patient();
    tables.assessments.extend([
        rass("H1", at(1, 1, 9, 0), 1.0),
        rass("H1", at(1, 1, 9, 44), 2.0),
        rass("H1", at(1, 1, 10, 30), -1.0),
    ]);
    assert_eq!(sat_day(&tables), (true, None));
}

#[test]
fn test_sat_sedated_to_awake() {
    let mut tables = sedated_patient();
    tables.assessments.extend([
        rass("H1", at(1, 1, 9, 0), -2.0),
        rass("H1", at(1, 1, 10, 0), 0.0),
        rass("H1", at(1, 1, 10, 45), 0.0),
    ]);
    assert_eq!(sat_day(&tables), (true, Some(SatOutcome::SedatedToAwake)));
}

#[test]
fn test_sat_outcomes_follow_priority_order() {
    let mut tables = sedated_patient();
    tables
        .medications
        .push(dose("H1", at(1, 1, 10, 0), Medication::Propofol, 0.0));
    tables.assessments.extend([
        rass("H1", at(1, 1, 9, 0), 2.0),
        rass("H1", at(1, 1, 9, 50), 2.0),
        rass("H1", at(1, 1, 11, 0), -2.0),
        rass("H1", at(1, 1, 12, 0), 0.0),
        rass("H1", at(1, 1, 13, 0), 0.0),
    ]);
    assert_eq!(sat_day(&tables), (true, Some(SatOutcome::CompleteCessation)));

    let ctx = ReportContext::new("Site A", "MICU", windows(date(1, 1), date(1, 1)));
    let report = QualityEngine::new(&tables).run(&ctx);
    let row = &report.trial_days[0];
    let flags = [
        row.sat_complete_cessation,
        row.sat_sedative_cessation,
        row.sat_dose_reduction_agitated,
        row.sat_no_change_agitated,
        row.sat_sedated_to_awake,
    ];
    assert_eq!(flags.iter().filter(|set| **set).count(), 1);
}

#[test]
fn test_sat_paralytic_in_window_blocks_eligibility() {
    let mut tables = sedated_patient();
    tables.medications.extend([
        dose("H1", at(1, 1, 10, 0), Medication::Propofol, 0.0),
        dose("H1", at(1, 1, 15, 0), Medication::Cisatracurium, 2.0),
    ]);
    assert_eq!(sat_day(&tables), (false, None));
}

#[test]
fn test_sat_requires_icu_and_sedation_at_morning() {
    let mut tables = sedated_patient();
    tables.stays[0].location_category = Some(icu_model::LocationCategory::Ward);
    assert_eq!(sat_day(&tables), (false, None));

    let mut tables = sedated_patient();
    tables.medications[0].dose = Some(0.0);
    assert_eq!(sat_day(&tables), (false, None));
}

#[test]
fn test_comfort_care_disqualifies_both_trials() {
    let mut tables = sedated_patient();
    tables
        .code_statuses
        .push(code_status("H1", at(1, 1, 5, 0), CodeStatusCategory::ComfortCare));
    assert_eq!(sat_day(&tables), (false, None));
    assert!(!sbt_days(&tables, 1)[0].sbt_eligible);

    let mut tables = sedated_patient();
    tables
        .code_statuses
        .push(code_status("H1", at(1, 1, 5, 0), CodeStatusCategory::Dnr));
    assert!(sat_day(&tables).0);
}

/// Controlled ventilation from 06:00, a pressure-support trial at 09:00 and
/// extubation to nasal cannula at 11:00.
fn extubated_patient() -> EventTables {
    EventTables {
        stays: vec![icu_stay(0, "H1", at(1, 1, 0, 0), None)],
        hospitalizations: vec![hospitalization("H1", None, None)],
        respiratory: vec![
            controlled("H1", at(1, 1, 6, 0)),
            pressure_support("H1", at(1, 1, 9, 0), 5.0),
            vent("H1", at(1, 1, 11, 0), DeviceCategory::NasalCannula, None),
        ],
        vitals: vec![vital("H1", at(1, 1, 20, 0), "heart_rate", 80.0)],
        ..EventTables::default()
    }
}

#[test]
fn test_sbt_successful_extubation() {
    let rows = sbt_days(&extubated_patient(), 1);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert!(row.sbt_eligible && row.sbt_done && row.extub_1st);
    assert!(row.success_extub);
    assert!(!row.fail_extub);
    assert_eq!(row.sbt_first_dttm, Some(at(1, 1, 9, 0).fixed_offset()));
}

#[test]
fn test_sbt_pressure_support_threshold_is_strict() {
    let mut tables = extubated_patient();
    tables.respiratory[1].pressure_support_set = Some(10.0);
    let row = &sbt_days(&tables, 1)[0];
    assert!(!row.sbt_done);
    assert_eq!(row.sbt_first_dttm, None);
}

#[test]
fn test_sbt_reintubation_is_failure() {
    let mut tables = extubated_patient();
    tables.respiratory.push(controlled("H1", at(1, 1, 15, 0)));
    let row = &sbt_days(&tables, 1)[0];
    assert!(row.extub_1st && row.fail_extub);
    assert!(!row.success_extub);
}

#[test]
fn test_sbt_success_needs_follow_up_and_survival() {
    let mut tables = extubated_patient();
    tables.vitals.clear();
    assert!(!sbt_days(&tables, 1)[0].success_extub);

    let mut tables = extubated_patient();
    tables.hospitalizations[0].discharge_category = Some(DischargeCategory::Expired);
    tables.hospitalizations[0].discharge_dttm = Some(at(1, 1, 18, 0));
    let row = &sbt_days(&tables, 1)[0];
    assert!(!row.success_extub && !row.fail_extub);
}

#[test]
fn test_sbt_first_extubation_only_counts_once() {
    let mut tables = extubated_patient();
    tables.respiratory.extend([
        controlled("H1", at(1, 1, 15, 0)),
        vent("H1", at(1, 2, 10, 0), DeviceCategory::NasalCannula, None),
    ]);
    tables.vitals.push(vital("H1", at(1, 2, 20, 0), "heart_rate", 82.0));

    let rows = sbt_days(&tables, 2);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].extub_1st && rows[0].fail_extub);
    assert!(!rows[1].extub_1st);
    assert!(rows[1].success_extub);
}

#[test]
fn test_sbt_tracheostomy_before_extubation() {
    let mut tables = extubated_patient();
    tables.respiratory.truncate(1);
    let mut trach = controlled("H1", at(1, 1, 12, 0));
    trach.tracheostomy = true;
    let mut collar = vent("H1", at(1, 1, 14, 0), DeviceCategory::TracheostomyCollar, None);
    collar.tracheostomy = true;
    tables.respiratory.extend([trach, collar]);

    let row = &sbt_days(&tables, 1)[0];
    assert!(row.trach_1st);
    assert!(!row.extub_1st);
}

#[test]
fn test_sbt_flags_stay_false_when_not_eligible() {
    let mut tables = extubated_patient();
    tables.respiratory[0].mode = Some(ModeCategory::PressureSupportCpap);
    tables.respiratory[0].pressure_support_set = Some(12.0);
    let row = &sbt_days(&tables, 1)[0];
    assert!(!row.sbt_eligible);
    assert!(!row.sbt_done && !row.extub_1st && !row.success_extub);
}

/// A row that charts settings only, with no device or mode.
fn settings_only(recorded: icu_model::Timestamp) -> icu_model::RespiratorySupportRecord {
    let mut record = controlled("H1", recorded);
    record.device = None;
    record.mode = None;
    record.tidal_volume_set = Some(450.0);
    record
}

#[test]
fn test_settings_only_rows_keep_the_last_device() {
    let mut tables = sedated_patient();
    tables.respiratory.push(settings_only(at(1, 1, 6, 30)));
    let rows = sbt_days(&tables, 1);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].sbt_eligible);

    let mut tables = sedated_patient();
    tables.respiratory.extend([
        settings_only(at(1, 1, 9, 0)),
        vent("H1", at(1, 1, 10, 0), DeviceCategory::NasalCannula, None),
    ]);
    tables.vitals.push(vital("H1", at(1, 1, 22, 0), "heart_rate", 78.0));
    let row = &sbt_days(&tables, 1)[0];
    assert!(row.sbt_eligible && row.extub_1st);
    assert!(row.success_extub && !row.fail_extub);
}

#[test]
fn test_days_without_morning_ventilation_have_no_rows() {
    let mut tables = extubated_patient();
    tables.respiratory[0].recorded = at(1, 1, 8, 0);
    assert!(sbt_days(&tables, 1).is_empty());
}

#[test]
fn test_ideal_body_weight_exact_values() {
    assert_eq!(ideal_body_weight(SexCategory::Female, 172.0), Some(63.5));
    assert_eq!(ideal_body_weight(SexCategory::Male, 172.0), Some(68.0));
}

#[test]
fn test_low_tidal_volume_boundary_is_strict() {
    let mut record = controlled("H1", at(1, 1, 8, 0));
    record.tidal_volume_set = Some(400.0);
    let at_boundary = LpvRecord::classify(&record, Some(SexCategory::Male), Some(152.0));
    assert_eq!(at_boundary.ml_per_kg(), Some(8.0));
    assert!(!at_boundary.is_low());

    record.tidal_volume_set = Some(399.0);
    assert!(LpvRecord::classify(&record, Some(SexCategory::Male), Some(152.0)).is_low());
    assert_eq!(LpvRecord::classify(&record, None, Some(152.0)), LpvRecord::Invalid);
    assert_eq!(
        LpvRecord::classify(&record, Some(SexCategory::Female), Some(100.0)),
        LpvRecord::Invalid
    );
}

#[test]
fn test_lpv_summary_over_period() {
    let with_tv = |hospitalization: &str, hour: u32, mode: ModeCategory, tv: Option<f64>| {
        let mut record = vent(hospitalization, at(1, 1, hour, 0), DeviceCategory::Imv, Some(mode));
        record.tidal_volume_set = tv;
        record
    };
    let mut outside = with_tv("H1", 8, ModeCategory::AssistControlVolumeControl, Some(300.0));
    outside.recorded = at(1, 5, 8, 0);

    let tables = EventTables {
        hospitalizations: vec![hospitalization("H1", None, None), hospitalization("H2", None, None)],
        patients: vec![patient("H1", SexCategory::Male)],
        vitals: vec![vital("H1", at(1, 1, 6, 0), "height_cm", 152.0)],
        respiratory: vec![
            with_tv("H1", 8, ModeCategory::AssistControlVolumeControl, Some(400.0)),
            with_tv("H1", 9, ModeCategory::PressureRegulatedVolumeControl, Some(399.0)),
            with_tv("H1", 10, ModeCategory::AssistControlVolumeControl, None),
            with_tv("H1", 11, ModeCategory::PressureSupportCpap, Some(300.0)),
            outside,
            with_tv("H2", 8, ModeCategory::AssistControlVolumeControl, Some(350.0)),
        ],
        ..EventTables::default()
    };
    let index = EventIndex::build(&tables);
    let (start, end) = windows(date(1, 1), date(1, 1)).period();
    let summary = lpv::evaluate(&index, start, end);

    assert_eq!(summary.total_controlled_mode_rows, 4);
    assert_eq!(summary.rows_with_valid_data, 2);
    assert_eq!(summary.low_tv_rows, 1);
    assert_eq!(summary.low_tv_percentage, Metric::Value(50.0));
    assert_eq!(summary.median_ml_per_kg, Metric::Value(8.0));

    let modes: Vec<_> = summary
        .by_mode
        .iter()
        .map(|row| (row.mode_category.as_str(), row.total_rows, row.valid_rows, row.low_tv_rows))
        .collect();
    assert_eq!(
        modes,
        vec![
            ("Assist Control-Volume Control", 3, 1, 0),
            ("Pressure-Regulated Volume Control", 1, 1, 1),
        ]
    );
}
