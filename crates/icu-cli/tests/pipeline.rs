//! Integration tests for a full reporting run.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use icu_cli::pipeline::{ReportRequest, build_context, run_report};
use icu_model::{Metric, SiteConfig};
use tempfile::TempDir;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn write_table(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(format!("clif_{name}.csv")), content).unwrap();
}

fn write_site(dir: &Path) -> SiteConfig {
    write_table(
        dir,
        "adt",
        "hospitalization_id,in_dttm,out_dttm,location_name,location_category\n\
         H1,2024-01-01 08:00:00,2024-01-03 10:00:00,MICU,icu\n\
         H1,2024-01-03 10:00:00,,7 West,ward\n",
    );
    write_table(
        dir,
        "hospitalization",
        "hospitalization_id,patient_id,discharge_category,discharge_dttm\n\
         H1,P1,Home,2024-01-06 12:00:00\n",
    );
    write_table(dir, "patient", "patient_id,sex_category\nP1,Female\n");
    write_table(
        dir,
        "medication_admin_continuous",
        "hospitalization_id,admin_dttm,med_category,med_dose\n\
         H1,2024-01-01 08:30:00,propofol,30\n",
    );
    write_table(
        dir,
        "patient_assessments",
        "hospitalization_id,recorded_dttm,assessment_category,numerical_value\n\
         H1,2024-01-01 09:00:00,RASS,-3\n",
    );
    write_table(
        dir,
        "code_status",
        "hospitalization_id,start_dttm,code_status_category\n\
         H1,2024-01-01 08:00:00,Full\n",
    );
    write_table(
        dir,
        "vitals",
        "hospitalization_id,recorded_dttm,vital_category,vital_value\n\
         H1,2024-01-01 08:00:00,height_cm,165\n",
    );
    write_table(
        dir,
        "respiratory_support",
        "hospitalization_id,recorded_dttm,device_category,mode_category,tidal_volume_set,pressure_support_set,tracheostomy\n\
         H1,2024-01-01 08:10:00,IMV,Assist Control-Volume Control,400,,0\n",
    );

    let json = format!(
        r#"{{"site_name": "Demo", "data_directory": {:?}, "timezone": "America/Chicago",
            "bed_capacity": {{"MICU": 10}}}}"#,
        dir.display().to_string()
    );
    let path = dir.join("config.json");
    fs::write(&path, json).unwrap();
    SiteConfig::load(&path).unwrap()
}

fn request() -> ReportRequest {
    ReportRequest {
        unit: "MICU".to_string(),
        start: date(1),
        end: date(3),
    }
}

#[test]
fn test_build_context_reads_unit_options() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());
    let ctx = build_context(&config, &request()).unwrap();
    assert_eq!(ctx.bed_capacity, Some(10));
    assert_eq!(ctx.transfer_lookahead_hours, 24);
    assert_eq!(ctx.windows.len(), 3);

    let reversed = ReportRequest {
        start: date(3),
        end: date(1),
        ..request()
    };
    assert!(build_context(&config, &reversed).is_err());
}

#[test]
fn test_run_report_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());
    let report = run_report(&config, &request()).unwrap();

    let census: Vec<_> = report
        .daily
        .iter()
        .map(|r| (r.census_7am, r.census_7pm, r.discharges, r.floor_transfers))
        .collect();
    assert_eq!(census, vec![(0, 1, 0, 0), (1, 1, 0, 0), (1, 0, 1, 1)]);
    assert_eq!(report.summary.census.bed_strain_pct, Metric::Value(6.7));

    assert_eq!(report.trial_days.len(), 2);
    assert_eq!(report.summary.hospitalizations, 1);
    assert_eq!(report.summary.sat.eligible_days, 2);
    assert_eq!(report.summary.sbt.eligible_days, 2);

    assert_eq!(report.lpv.total_controlled_mode_rows, 1);
    assert_eq!(report.lpv.low_tv_rows, 1);
    assert_eq!(report.lpv.low_tv_percentage, Metric::Value(100.0));
}

#[test]
fn test_run_report_missing_table_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_site(dir.path());
    fs::remove_file(dir.path().join("clif_vitals.csv")).unwrap();
    let error = run_report(&config, &request()).unwrap_err();
    assert!(format!("{error:#}").contains("load source tables"));
}
