//! Typed, timezone-localized event rows produced by the table adapter.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::enums::{
    CodeStatusCategory, DeviceCategory, DischargeCategory, LocationCategory, Medication,
    ModeCategory, SexCategory,
};
use crate::ids::{HospitalizationId, SubjectId};

/// An instant localized in the site timezone.
pub type Timestamp = DateTime<Tz>;

/// One ADT location interval.
#[derive(Debug, Clone, PartialEq)]
pub struct StayInterval {
    /// Position in the source table; the deterministic tie-break for joins.
    pub id: u64,
    pub subject_id: Option<SubjectId>,
    pub hospitalization_id: HospitalizationId,
    pub location_name: String,
    pub location_category: Option<LocationCategory>,
    pub location_type: Option<String>,
    pub start: Timestamp,
    /// `None` while the patient is still in the location.
    pub end: Option<Timestamp>,
}

impl StayInterval {
    /// Half-open presence test: `start <= t < end`.
    pub fn contains(&self, t: Timestamp) -> bool {
        self.start <= t && self.end.is_none_or(|end| end > t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hospitalization {
    pub hospitalization_id: HospitalizationId,
    pub subject_id: SubjectId,
    pub discharge_category: Option<DischargeCategory>,
    pub discharge_dttm: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub subject_id: SubjectId,
    pub sex: Option<SexCategory>,
}

/// A continuous-infusion rate change.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicationEvent {
    pub hospitalization_id: HospitalizationId,
    pub recorded: Timestamp,
    pub medication: Medication,
    pub dose: Option<f64>,
}

impl MedicationEvent {
    /// Dose used for on/off decisions; a missing dose counts as stopped.
    pub fn effective_dose(&self) -> f64 {
        self.dose.unwrap_or(0.0)
    }
}

/// A RASS assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentEvent {
    pub hospitalization_id: HospitalizationId,
    pub recorded: Timestamp,
    pub rass: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeStatusEvent {
    pub hospitalization_id: HospitalizationId,
    pub start: Timestamp,
    pub category: Option<CodeStatusCategory>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VitalSignEvent {
    pub hospitalization_id: HospitalizationId,
    pub recorded: Timestamp,
    /// Lowercased `vital_category`.
    pub category: String,
    pub value: Option<f64>,
}

impl VitalSignEvent {
    pub const HEIGHT_CM: &'static str = "height_cm";
}

#[derive(Debug, Clone, PartialEq)]
pub struct RespiratorySupportRecord {
    pub hospitalization_id: HospitalizationId,
    pub recorded: Timestamp,
    pub device: Option<DeviceCategory>,
    pub mode: Option<ModeCategory>,
    /// Set tidal volume in mL.
    pub tidal_volume_set: Option<f64>,
    /// Set pressure support in cmH2O.
    pub pressure_support_set: Option<f64>,
    pub tracheostomy: bool,
}

impl RespiratorySupportRecord {
    pub fn is_invasive(&self) -> bool {
        self.device.is_some_and(|device| device.is_invasive())
    }

    pub fn is_controlled(&self) -> bool {
        self.is_invasive() && self.mode.is_some_and(|mode| mode.is_controlled())
    }
}

/// Every table the engine consumes, already typed and localized.
#[derive(Debug, Clone, Default)]
pub struct EventTables {
    pub stays: Vec<StayInterval>,
    pub hospitalizations: Vec<Hospitalization>,
    pub patients: Vec<Patient>,
    pub medications: Vec<MedicationEvent>,
    pub assessments: Vec<AssessmentEvent>,
    pub code_statuses: Vec<CodeStatusEvent>,
    pub vitals: Vec<VitalSignEvent>,
    pub respiratory: Vec<RespiratorySupportRecord>,
}

impl EventTables {
    pub fn total_rows(&self) -> usize {
        self.stays.len()
            + self.hospitalizations.len()
            + self.patients.len()
            + self.medications.len()
            + self.assessments.len()
            + self.code_statuses.len()
            + self.vitals.len()
            + self.respiratory.len()
    }
}
