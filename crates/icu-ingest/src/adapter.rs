//! Event table adapter: raw source frames to typed, localized events.
//!
//! Every table is checked for its required columns before any row is read.
//! Missing categories stay `None`; present but unknown labels map to the
//! category's catch-all variant. Rows without the identifiers or timestamps
//! an event needs are skipped and counted in the logs.

use std::collections::{BTreeMap, BTreeSet};

use chrono_tz::Tz;
use icu_model::{
    AssessmentEvent, CodeStatusCategory, CodeStatusEvent, DeviceCategory, DischargeCategory,
    EventTables, Hospitalization, HospitalizationId, LocationCategory, Medication,
    MedicationEvent, ModeCategory, Patient, RespiratorySupportRecord, SexCategory, StayInterval,
    SubjectId, VitalSignEvent,
};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, trace};

use crate::error::{IngestError, Result};
use crate::frame::TableFrame;

/// Source tables consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableKind {
    Adt,
    Hospitalization,
    Patient,
    MedicationAdminContinuous,
    PatientAssessments,
    CodeStatus,
    Vitals,
    RespiratorySupport,
}

impl TableKind {
    pub const ALL: [TableKind; 8] = [
        TableKind::Adt,
        TableKind::Hospitalization,
        TableKind::Patient,
        TableKind::MedicationAdminContinuous,
        TableKind::PatientAssessments,
        TableKind::CodeStatus,
        TableKind::Vitals,
        TableKind::RespiratorySupport,
    ];

    /// Table name as used in `clif_<name>` files.
    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Adt => "adt",
            TableKind::Hospitalization => "hospitalization",
            TableKind::Patient => "patient",
            TableKind::MedicationAdminContinuous => "medication_admin_continuous",
            TableKind::PatientAssessments => "patient_assessments",
            TableKind::CodeStatus => "code_status",
            TableKind::Vitals => "vitals",
            TableKind::RespiratorySupport => "respiratory_support",
        }
    }

    /// Required columns; each entry lists a name followed by its aliases.
    pub fn required_columns(&self) -> &'static [&'static [&'static str]] {
        match self {
            TableKind::Adt => &[
                &["hospitalization_id"],
                &["in_dttm"],
                &["out_dttm"],
                &["location_name"],
                &["location_category"],
            ],
            TableKind::Hospitalization => &[
                &["hospitalization_id"],
                &["patient_id"],
                &["discharge_category"],
                &["discharge_dttm"],
            ],
            TableKind::Patient => &[&["patient_id"], &["sex_category"]],
            TableKind::MedicationAdminContinuous => &[
                &["hospitalization_id"],
                &["admin_dttm"],
                &["med_category"],
                &["med_dose"],
            ],
            TableKind::PatientAssessments => &[
                &["hospitalization_id"],
                &["recorded_dttm"],
                &["assessment_category"],
                &["numerical_value", "assessment_value"],
            ],
            TableKind::CodeStatus => &[
                &["hospitalization_id", "patient_id"],
                &["start_dttm"],
                &["code_status_category"],
            ],
            TableKind::Vitals => &[
                &["hospitalization_id"],
                &["recorded_dttm"],
                &["vital_category"],
                &["vital_value"],
            ],
            TableKind::RespiratorySupport => &[
                &["hospitalization_id"],
                &["recorded_dttm"],
                &["device_category"],
                &["mode_category"],
                &["tidal_volume_set"],
                &["pressure_support_set"],
            ],
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw frames for every source table.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub adt: DataFrame,
    pub hospitalization: DataFrame,
    pub patient: DataFrame,
    pub medication_admin_continuous: DataFrame,
    pub patient_assessments: DataFrame,
    pub code_status: DataFrame,
    pub vitals: DataFrame,
    pub respiratory_support: DataFrame,
}

impl RawTables {
    pub fn get(&self, kind: TableKind) -> &DataFrame {
        match kind {
            TableKind::Adt => &self.adt,
            TableKind::Hospitalization => &self.hospitalization,
            TableKind::Patient => &self.patient,
            TableKind::MedicationAdminContinuous => &self.medication_admin_continuous,
            TableKind::PatientAssessments => &self.patient_assessments,
            TableKind::CodeStatus => &self.code_status,
            TableKind::Vitals => &self.vitals,
            TableKind::RespiratorySupport => &self.respiratory_support,
        }
    }
}

/// Fails with [`IngestError::Schema`] on the first missing required column.
pub fn validate_schema(kind: TableKind, df: &DataFrame) -> Result<()> {
    let frame = TableFrame::new(kind.name(), df);
    for candidates in kind.required_columns() {
        if !frame.has_any(candidates) {
            return Err(IngestError::Schema {
                table: kind.name(),
                column: candidates.join(" or "),
            });
        }
    }
    Ok(())
}

/// Adapts every raw table into typed events localized in `tz`.
pub fn adapt_tables(raw: &RawTables, tz: Tz) -> Result<EventTables> {
    let span = info_span!("adapt", timezone = %tz);
    let _guard = span.enter();

    for kind in TableKind::ALL {
        validate_schema(kind, raw.get(kind))?;
    }

    let hospitalizations = adapt_hospitalizations(&raw.hospitalization, tz)?;
    let subjects: BTreeMap<HospitalizationId, SubjectId> = hospitalizations
        .iter()
        .map(|h| (h.hospitalization_id.clone(), h.subject_id.clone()))
        .collect();

    let tables = EventTables {
        stays: adapt_stays(&raw.adt, tz, &subjects)?,
        patients: adapt_patients(&raw.patient)?,
        medications: adapt_medications(&raw.medication_admin_continuous, tz)?,
        assessments: adapt_assessments(&raw.patient_assessments, tz)?,
        code_statuses: adapt_code_statuses(&raw.code_status, tz, &hospitalizations)?,
        vitals: adapt_vitals(&raw.vitals, tz)?,
        respiratory: adapt_respiratory(&raw.respiratory_support, tz)?,
        hospitalizations,
    };

    info!(
        stays = tables.stays.len(),
        hospitalizations = tables.hospitalizations.len(),
        medications = tables.medications.len(),
        assessments = tables.assessments.len(),
        code_statuses = tables.code_statuses.len(),
        vitals = tables.vitals.len(),
        respiratory = tables.respiratory.len(),
        "adapt complete"
    );
    Ok(tables)
}

fn log_skipped(table: &'static str, skipped: usize, reason: &str) {
    if skipped > 0 {
        debug!(table, skipped, reason, "skipped source rows");
    }
}

fn hospitalization_id(text: Option<String>) -> Option<HospitalizationId> {
    text.and_then(|value| HospitalizationId::new(value).ok())
}

fn subject_id(text: Option<String>) -> Option<SubjectId> {
    text.and_then(|value| SubjectId::new(value).ok())
}

/// ADT rows become stay intervals; the interval id is the source row index.
pub fn adapt_stays(
    df: &DataFrame,
    tz: Tz,
    subjects: &BTreeMap<HospitalizationId, SubjectId>,
) -> Result<Vec<StayInterval>> {
    let frame = TableFrame::new(TableKind::Adt.name(), df);
    let hosp_col = frame.require(&["hospitalization_id"])?;
    let in_col = frame.require(&["in_dttm"])?;
    let out_col = frame.require(&["out_dttm"])?;
    let name_col = frame.require(&["location_name"])?;
    let category_col = frame.require(&["location_category"])?;
    let type_col = frame.optional(&["location_type"])?;

    let mut stays = Vec::with_capacity(frame.height());
    let mut skipped = 0usize;
    for row in 0..frame.height() {
        let start = in_col.timestamp(row, tz)?;
        let end = out_col.timestamp(row, tz)?;
        let (Some(hospitalization_id), Some(start), Some(location_name)) =
            (hospitalization_id(hosp_col.text(row)), start, name_col.text(row))
        else {
            skipped += 1;
            continue;
        };
        stays.push(StayInterval {
            id: row as u64,
            subject_id: subjects.get(&hospitalization_id).cloned(),
            hospitalization_id,
            location_name,
            location_category: category_col
                .text(row)
                .map(|label| LocationCategory::from(label.as_str())),
            location_type: type_col.as_ref().and_then(|col| col.text(row)),
            start,
            end,
        });
    }
    log_skipped(TableKind::Adt.name(), skipped, "missing id, in_dttm or location");
    Ok(stays)
}

pub fn adapt_hospitalizations(df: &DataFrame, tz: Tz) -> Result<Vec<Hospitalization>> {
    let frame = TableFrame::new(TableKind::Hospitalization.name(), df);
    let hosp_col = frame.require(&["hospitalization_id"])?;
    let patient_col = frame.require(&["patient_id"])?;
    let category_col = frame.require(&["discharge_category"])?;
    let discharge_col = frame.require(&["discharge_dttm"])?;

    let mut rows = Vec::with_capacity(frame.height());
    let mut skipped = 0usize;
    for row in 0..frame.height() {
        let discharge_dttm = discharge_col.timestamp(row, tz)?;
        let (Some(hospitalization_id), Some(subject_id)) = (
            hospitalization_id(hosp_col.text(row)),
            subject_id(patient_col.text(row)),
        ) else {
            skipped += 1;
            continue;
        };
        rows.push(Hospitalization {
            hospitalization_id,
            subject_id,
            discharge_category: category_col
                .text(row)
                .map(|label| DischargeCategory::from(label.as_str())),
            discharge_dttm,
        });
    }
    log_skipped(TableKind::Hospitalization.name(), skipped, "missing id");
    Ok(rows)
}

pub fn adapt_patients(df: &DataFrame) -> Result<Vec<Patient>> {
    let frame = TableFrame::new(TableKind::Patient.name(), df);
    let patient_col = frame.require(&["patient_id"])?;
    let sex_col = frame.require(&["sex_category"])?;

    let patients = (0..frame.height())
        .filter_map(|row| {
            subject_id(patient_col.text(row)).map(|subject_id| Patient {
                subject_id,
                sex: sex_col
                    .text(row)
                    .map(|label| SexCategory::from(label.as_str())),
            })
        })
        .collect();
    Ok(patients)
}

/// Keeps only the tracked sedative and paralytic infusions.
pub fn adapt_medications(df: &DataFrame, tz: Tz) -> Result<Vec<MedicationEvent>> {
    let frame = TableFrame::new(TableKind::MedicationAdminContinuous.name(), df);
    let hosp_col = frame.require(&["hospitalization_id"])?;
    let time_col = frame.require(&["admin_dttm"])?;
    let med_col = frame.require(&["med_category"])?;
    let dose_col = frame.require(&["med_dose"])?;

    let mut events = Vec::new();
    let mut untracked = 0usize;
    for row in 0..frame.height() {
        let Some(medication) = med_col
            .text(row)
            .and_then(|label| label.parse::<Medication>().ok())
        else {
            untracked += 1;
            continue;
        };
        let recorded = time_col.timestamp(row, tz)?;
        let dose = dose_col.number(row)?;
        let (Some(hospitalization_id), Some(recorded)) =
            (hospitalization_id(hosp_col.text(row)), recorded)
        else {
            continue;
        };
        events.push(MedicationEvent {
            hospitalization_id,
            recorded,
            medication,
            dose,
        });
    }
    log_skipped(
        TableKind::MedicationAdminContinuous.name(),
        untracked,
        "untracked medication",
    );
    Ok(events)
}

/// Keeps RASS assessments with a numeric score.
pub fn adapt_assessments(df: &DataFrame, tz: Tz) -> Result<Vec<AssessmentEvent>> {
    let frame = TableFrame::new(TableKind::PatientAssessments.name(), df);
    let hosp_col = frame.require(&["hospitalization_id"])?;
    let time_col = frame.require(&["recorded_dttm"])?;
    let category_col = frame.require(&["assessment_category"])?;
    let value_col = frame.require(&["numerical_value", "assessment_value"])?;

    let mut events = Vec::new();
    for row in 0..frame.height() {
        let is_rass = category_col
            .text(row)
            .is_some_and(|label| label.eq_ignore_ascii_case("rass"));
        if !is_rass {
            continue;
        }
        let recorded = time_col.timestamp(row, tz)?;
        let rass = value_col.number(row)?;
        if let (Some(hospitalization_id), Some(recorded), Some(rass)) =
            (hospitalization_id(hosp_col.text(row)), recorded, rass)
        {
            events.push(AssessmentEvent {
                hospitalization_id,
                recorded,
                rass,
            });
        }
    }
    Ok(events)
}

/// Code status rows keyed by patient expand to every hospitalization of that
/// patient.
pub fn adapt_code_statuses(
    df: &DataFrame,
    tz: Tz,
    hospitalizations: &[Hospitalization],
) -> Result<Vec<CodeStatusEvent>> {
    let frame = TableFrame::new(TableKind::CodeStatus.name(), df);
    let time_col = frame.require(&["start_dttm"])?;
    let category_col = frame.require(&["code_status_category"])?;
    let hosp_col = frame.optional(&["hospitalization_id"])?;
    let patient_col = match hosp_col {
        Some(_) => None,
        None => Some(frame.require(&["hospitalization_id", "patient_id"])?),
    };

    let mut by_subject: BTreeMap<&SubjectId, Vec<&HospitalizationId>> = BTreeMap::new();
    for h in hospitalizations {
        by_subject
            .entry(&h.subject_id)
            .or_default()
            .push(&h.hospitalization_id);
    }

    let mut events = Vec::new();
    for row in 0..frame.height() {
        let Some(start) = time_col.timestamp(row, tz)? else {
            continue;
        };
        let category = category_col
            .text(row)
            .map(|label| CodeStatusCategory::from(label.as_str()));
        let targets: Vec<HospitalizationId> = match (&hosp_col, &patient_col) {
            (Some(col), _) => hospitalization_id(col.text(row)).into_iter().collect(),
            (None, Some(col)) => subject_id(col.text(row))
                .and_then(|subject| by_subject.get(&subject))
                .map(|ids| ids.iter().map(|id| (*id).clone()).collect())
                .unwrap_or_default(),
            (None, None) => Vec::new(),
        };
        for hospitalization_id in targets {
            trace!(%hospitalization_id, ?category, "code status");
            events.push(CodeStatusEvent {
                hospitalization_id,
                start,
                category,
            });
        }
    }
    Ok(events)
}

pub fn adapt_vitals(df: &DataFrame, tz: Tz) -> Result<Vec<VitalSignEvent>> {
    let frame = TableFrame::new(TableKind::Vitals.name(), df);
    let hosp_col = frame.require(&["hospitalization_id"])?;
    let time_col = frame.require(&["recorded_dttm"])?;
    let category_col = frame.require(&["vital_category"])?;
    let value_col = frame.require(&["vital_value"])?;

    let mut events = Vec::with_capacity(frame.height());
    for row in 0..frame.height() {
        let recorded = time_col.timestamp(row, tz)?;
        let value = value_col.number(row)?;
        let (Some(hospitalization_id), Some(recorded), Some(category)) = (
            hospitalization_id(hosp_col.text(row)),
            recorded,
            category_col.text(row),
        ) else {
            continue;
        };
        events.push(VitalSignEvent {
            hospitalization_id,
            recorded,
            category: category.to_lowercase(),
            value,
        });
    }
    Ok(events)
}

/// A missing tracheostomy column or cell reads as no tracheostomy.
pub fn adapt_respiratory(df: &DataFrame, tz: Tz) -> Result<Vec<RespiratorySupportRecord>> {
    let frame = TableFrame::new(TableKind::RespiratorySupport.name(), df);
    let hosp_col = frame.require(&["hospitalization_id"])?;
    let time_col = frame.require(&["recorded_dttm"])?;
    let device_col = frame.require(&["device_category"])?;
    let mode_col = frame.require(&["mode_category"])?;
    let tv_col = frame.require(&["tidal_volume_set"])?;
    let ps_col = frame.require(&["pressure_support_set"])?;
    let trach_col = frame.optional(&["tracheostomy"])?;

    let mut records = Vec::with_capacity(frame.height());
    for row in 0..frame.height() {
        let recorded = time_col.timestamp(row, tz)?;
        let tidal_volume_set = tv_col.number(row)?;
        let pressure_support_set = ps_col.number(row)?;
        let tracheostomy = match &trach_col {
            Some(col) => col.flag(row)?.unwrap_or(false),
            None => false,
        };
        let (Some(hospitalization_id), Some(recorded)) =
            (hospitalization_id(hosp_col.text(row)), recorded)
        else {
            continue;
        };
        records.push(RespiratorySupportRecord {
            hospitalization_id,
            recorded,
            device: device_col
                .text(row)
                .map(|label| DeviceCategory::from(label.as_str())),
            mode: mode_col
                .text(row)
                .map(|label| ModeCategory::from(label.as_str())),
            tidal_volume_set,
            pressure_support_set,
            tracheostomy,
        });
    }
    Ok(records)
}

/// Distinct ICU location names found in an ADT frame, sorted.
pub fn icu_location_names(df: &DataFrame) -> Result<Vec<String>> {
    validate_schema(TableKind::Adt, df)?;
    let frame = TableFrame::new(TableKind::Adt.name(), df);
    let name_col = frame.require(&["location_name"])?;
    let category_col = frame.require(&["location_category"])?;

    let mut names = BTreeSet::new();
    for row in 0..frame.height() {
        let is_icu = category_col
            .text(row)
            .is_some_and(|label| LocationCategory::from(label.as_str()) == LocationCategory::Icu);
        if let (true, Some(name)) = (is_icu, name_col.text(row)) {
            names.insert(name);
        }
    }
    Ok(names.into_iter().collect())
}
