//! Event builders shared by the engine tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use chrono_tz::America::Chicago;
use icu_core::{DayWindows, WindowPolicy};
use icu_model::{
    AssessmentEvent, CodeStatusCategory, CodeStatusEvent, DeviceCategory, DischargeCategory,
    Hospitalization, HospitalizationId, LocationCategory, Medication, MedicationEvent,
    ModeCategory, Patient, RespiratorySupportRecord, SexCategory, StayInterval, SubjectId,
    Timestamp, VitalSignEvent, localize,
};

pub fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

/// Chicago wall-clock instant in 2024.
pub fn at(m: u32, d: u32, hour: u32, minute: u32) -> Timestamp {
    localize(date(m, d).and_hms_opt(hour, minute, 0).unwrap(), Chicago)
}

pub fn windows(first: NaiveDate, last: NaiveDate) -> DayWindows {
    DayWindows::new(first, last, WindowPolicy::new(Chicago)).unwrap()
}

pub fn hosp(id: &str) -> HospitalizationId {
    HospitalizationId::new(id).unwrap()
}

pub fn stay(
    id: u64,
    hospitalization: &str,
    location: &str,
    category: LocationCategory,
    start: Timestamp,
    end: Option<Timestamp>,
) -> StayInterval {
    StayInterval {
        id,
        subject_id: None,
        hospitalization_id: hosp(hospitalization),
        location_name: location.to_string(),
        location_category: Some(category),
        location_type: None,
        start,
        end,
    }
}

pub fn icu_stay(id: u64, hospitalization: &str, start: Timestamp, end: Option<Timestamp>) -> StayInterval {
    stay(id, hospitalization, "MICU", LocationCategory::Icu, start, end)
}

pub fn hospitalization(
    id: &str,
    category: Option<DischargeCategory>,
    discharged: Option<Timestamp>,
) -> Hospitalization {
    Hospitalization {
        hospitalization_id: hosp(id),
        subject_id: SubjectId::new(format!("P-{id}")).unwrap(),
        discharge_category: category,
        discharge_dttm: discharged,
    }
}

pub fn patient(hospitalization: &str, sex: SexCategory) -> Patient {
    Patient {
        subject_id: SubjectId::new(format!("P-{hospitalization}")).unwrap(),
        sex: Some(sex),
    }
}

pub fn vent(
    hospitalization: &str,
    recorded: Timestamp,
    device: DeviceCategory,
    mode: Option<ModeCategory>,
) -> RespiratorySupportRecord {
    RespiratorySupportRecord {
        hospitalization_id: hosp(hospitalization),
        recorded,
        device: Some(device),
        mode,
        tidal_volume_set: None,
        pressure_support_set: None,
        tracheostomy: false,
    }
}

pub fn controlled(hospitalization: &str, recorded: Timestamp) -> RespiratorySupportRecord {
    vent(
        hospitalization,
        recorded,
        DeviceCategory::Imv,
        Some(ModeCategory::AssistControlVolumeControl),
    )
}

pub fn pressure_support(hospitalization: &str, recorded: Timestamp, ps: f64) -> RespiratorySupportRecord {
    RespiratorySupportRecord {
        pressure_support_set: Some(ps),
        ..vent(
            hospitalization,
            recorded,
            DeviceCategory::Imv,
            Some(ModeCategory::PressureSupportCpap),
        )
    }
}

pub fn dose(hospitalization: &str, recorded: Timestamp, medication: Medication, dose: f64) -> MedicationEvent {
    MedicationEvent {
        hospitalization_id: hosp(hospitalization),
        recorded,
        medication,
        dose: Some(dose),
    }
}

pub fn rass(hospitalization: &str, recorded: Timestamp, score: f64) -> AssessmentEvent {
    AssessmentEvent {
        hospitalization_id: hosp(hospitalization),
        recorded,
        rass: score,
    }
}

pub fn code_status(hospitalization: &str, start: Timestamp, category: CodeStatusCategory) -> CodeStatusEvent {
    CodeStatusEvent {
        hospitalization_id: hosp(hospitalization),
        start,
        category: Some(category),
    }
}

pub fn vital(hospitalization: &str, recorded: Timestamp, category: &str, value: f64) -> VitalSignEvent {
    VitalSignEvent {
        hospitalization_id: hosp(hospitalization),
        recorded,
        category: category.to_string(),
        value: Some(value),
    }
}
