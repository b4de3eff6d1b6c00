//! Census, flow and discharge outcome tests.

mod common;

use chrono::TimeDelta;
use common::*;
use icu_core::{
    Cohort, DischargeOutcome, OutcomeClassifier, QualityEngine, ReportContext, TransferJoin,
    census_totals,
};
use icu_model::{DischargeCategory, EventTables, LocationCategory, Metric};

fn scenario() -> EventTables {
    EventTables {
        stays: vec![icu_stay(0, "H1", at(1, 1, 8, 0), Some(at(1, 3, 10, 0)))],
        hospitalizations: vec![hospitalization("H1", Some(DischargeCategory::Home), Some(at(1, 5, 12, 0)))],
        ..EventTables::default()
    }
}

#[test]
fn test_three_day_stay_end_to_end() {
    let tables = scenario();
    let ctx = ReportContext::new("Site A", "MICU", windows(date(1, 1), date(1, 3)));
    let report = QualityEngine::new(&tables).run(&ctx);

    let rows: Vec<_> = report
        .daily
        .iter()
        .map(|r| (r.admissions, r.census_7am, r.census_7pm, r.discharges))
        .collect();
    assert_eq!(rows, vec![(1, 0, 1, 0), (0, 1, 1, 0), (0, 1, 0, 1)]);
    assert_eq!(report.daily[2].date, date(1, 3));
    assert_eq!(report.unmatched_discharges, 0);

    let census = &report.summary.census;
    assert_eq!(census.days, 3);
    assert_eq!(census.total_admissions, 1);
    assert_eq!(census.total_discharges, 1);
    assert_eq!(census.daily_census, Metric::Value(0.7));
    assert_eq!(census.bed_strain_pct, Metric::NotApplicable);
    assert!(report.trial_days.is_empty());
    assert_eq!(report.summary.sat.complete_cessation.percentage(), Metric::NotApplicable);
}

#[test]
fn test_census_is_half_open() {
    let stays = vec![icu_stay(0, "H1", at(1, 1, 7, 0), Some(at(1, 2, 19, 0)))];
    let cohort = Cohort::for_location(&stays, "MICU");
    assert_eq!(cohort.census_at(at(1, 1, 7, 0)), 1);
    assert_eq!(cohort.census_at(at(1, 1, 6, 59)), 0);
    assert_eq!(cohort.census_at(at(1, 2, 19, 0)), 0);
    assert_eq!(cohort.census_at(at(1, 2, 18, 59)), 1);
}

#[test]
fn test_admissions_on_the_anchor_belong_to_the_new_day() {
    let stays = vec![
        icu_stay(0, "H1", at(1, 2, 7, 0), None),
        icu_stay(1, "H2", at(1, 2, 6, 59), None),
    ];
    let cohort = Cohort::for_location(&stays, "MICU");
    let days = windows(date(1, 1), date(1, 2));
    let counts: Vec<_> = days.iter().map(|w| cohort.admissions(&w)).collect();
    assert_eq!(counts, vec![1, 1]);
}

#[test]
fn test_cohort_matches_location_name_exactly() {
    let stays = vec![
        icu_stay(0, "H1", at(1, 1, 8, 0), None),
        stay(1, "H2", "SICU", LocationCategory::Icu, at(1, 1, 8, 0), None),
    ];
    assert_eq!(Cohort::for_location(&stays, "MICU").len(), 1);
    assert!(Cohort::for_location(&stays, "micu").is_empty());
}

#[test]
fn test_floor_transfer_breaks_ties_on_interval_id() {
    let discharged_at = at(1, 2, 10, 0);
    let ward_first = vec![
        icu_stay(0, "H1", at(1, 1, 8, 0), Some(discharged_at)),
        stay(1, "H1", "4 West", LocationCategory::Ward, discharged_at, None),
        stay(2, "H1", "SICU", LocationCategory::Icu, discharged_at, None),
    ];
    let join = TransferJoin::new(&ward_first, TimeDelta::hours(24));
    assert_eq!(join.next_stay(&ward_first[0]).map(|s| s.id), Some(1));
    assert!(join.is_floor_transfer(&ward_first[0]));
    assert!(join.is_floor_transfer(&ward_first[0]));

    let icu_first = vec![
        icu_stay(0, "H1", at(1, 1, 8, 0), Some(discharged_at)),
        stay(1, "H1", "SICU", LocationCategory::Icu, discharged_at, None),
        stay(2, "H1", "4 West", LocationCategory::Ward, discharged_at, None),
    ];
    let join = TransferJoin::new(&icu_first, TimeDelta::hours(24));
    assert!(!join.is_floor_transfer(&icu_first[0]));
}

#[test]
fn test_floor_transfer_lookahead_is_bounded() {
    let discharged_at = at(1, 2, 10, 0);
    let stays = vec![
        icu_stay(0, "H1", at(1, 1, 8, 0), Some(discharged_at)),
        stay(1, "H1", "5 East", LocationCategory::Stepdown, at(1, 3, 10, 0), None),
        icu_stay(2, "H2", at(1, 1, 8, 0), Some(discharged_at)),
        stay(3, "H2", "5 East", LocationCategory::Stepdown, at(1, 3, 10, 1), None),
        stay(4, "H3", "4 West", LocationCategory::Ward, discharged_at, None),
    ];
    let join = TransferJoin::new(&stays, TimeDelta::hours(24));
    assert!(join.is_floor_transfer(&stays[0]));
    assert!(!join.is_floor_transfer(&stays[2]));
}

#[test]
fn test_discharge_outcomes_partition_known_categories() {
    let end = at(1, 1, 15, 0);
    let stays = vec![
        icu_stay(0, "DEAD", at(1, 1, 8, 0), Some(end)),
        icu_stay(1, "HOSPICE", at(1, 1, 8, 0), Some(end)),
        icu_stay(2, "SNF", at(1, 1, 8, 0), Some(end)),
        icu_stay(3, "HOME", at(1, 1, 8, 0), Some(end)),
        icu_stay(4, "LATER", at(1, 1, 8, 0), Some(end)),
        icu_stay(5, "MISSING", at(1, 1, 8, 0), Some(end)),
    ];
    let hospitalizations = vec![
        hospitalization("DEAD", Some(DischargeCategory::Expired), Some(end)),
        hospitalization("HOSPICE", Some(DischargeCategory::Hospice), Some(end)),
        hospitalization("SNF", Some(DischargeCategory::SkilledNursingFacility), Some(end)),
        hospitalization("HOME", Some(DischargeCategory::Home), Some(end)),
        hospitalization("LATER", Some(DischargeCategory::Expired), Some(at(1, 4, 9, 0))),
    ];
    let window = windows(date(1, 1), date(1, 1)).iter().next().unwrap();
    let classifier = OutcomeClassifier::new(&hospitalizations);

    let each: Vec<_> = stays.iter().map(|s| classifier.classify_one(s, &window)).collect();
    assert_eq!(
        each,
        vec![
            DischargeOutcome::Death,
            DischargeOutcome::Hospice,
            DischargeOutcome::Facility,
            DischargeOutcome::Other,
            DischargeOutcome::NotHospitalDischarge,
            DischargeOutcome::Unmatched,
        ]
    );

    let refs: Vec<_> = stays.iter().collect();
    let counts = classifier.classify(&refs, &window);
    assert_eq!((counts.deaths, counts.hospice, counts.facility), (1, 1, 1));
    assert_eq!(counts.unmatched, 1);
}

#[test]
fn test_bed_strain_uses_mean_morning_census() {
    let tables = scenario();
    let ctx = ReportContext::new("Site A", "MICU", windows(date(1, 1), date(1, 3))).with_bed_capacity(2);
    let report = QualityEngine::new(&tables).run(&ctx);
    let totals = census_totals(&report.daily, Some(2));
    assert_eq!(totals.bed_strain_pct, Metric::Value(33.3));
    assert_eq!(report.summary.census.bed_strain_pct, Metric::Value(33.3));
    assert_eq!(census_totals(&report.daily, Some(0)).bed_strain_pct, Metric::NotApplicable);
}
