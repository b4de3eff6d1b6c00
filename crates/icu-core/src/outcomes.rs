//! Discharge outcome classification.
//!
//! A unit discharge counts toward deaths, hospice or facility only when the
//! hospitalization itself ended inside the same reporting day.

use std::collections::BTreeMap;

use icu_model::{DischargeCategory, Hospitalization, HospitalizationId, StayInterval};

use crate::window::DayWindow;

/// Where one unit discharge lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DischargeOutcome {
    Death,
    Hospice,
    Facility,
    /// Hospital discharge in the window with any other category.
    Other,
    /// The hospitalization did not end in this window.
    NotHospitalDischarge,
    /// No hospitalization record, category or discharge time.
    Unmatched,
}

/// Outcome counts for one reporting day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DischargeOutcomes {
    pub deaths: usize,
    pub hospice: usize,
    pub facility: usize,
    pub unmatched: usize,
}

impl DischargeOutcomes {
    fn record(&mut self, outcome: DischargeOutcome) {
        match outcome {
            DischargeOutcome::Death => self.deaths += 1,
            DischargeOutcome::Hospice => self.hospice += 1,
            DischargeOutcome::Facility => self.facility += 1,
            DischargeOutcome::Unmatched => self.unmatched += 1,
            DischargeOutcome::Other | DischargeOutcome::NotHospitalDischarge => {}
        }
    }
}

/// Joins discharges to hospitalization outcomes by hospitalization id.
#[derive(Debug)]
pub struct OutcomeClassifier<'a> {
    by_id: BTreeMap<&'a HospitalizationId, &'a Hospitalization>,
}

impl<'a> OutcomeClassifier<'a> {
    pub fn new(hospitalizations: &'a [Hospitalization]) -> Self {
        let by_id = hospitalizations
            .iter()
            .map(|h| (&h.hospitalization_id, h))
            .collect();
        Self { by_id }
    }

    pub fn classify_one(&self, discharge: &StayInterval, window: &DayWindow) -> DischargeOutcome {
        let Some(hospitalization) = self.by_id.get(&discharge.hospitalization_id) else {
            return DischargeOutcome::Unmatched;
        };
        let (Some(category), Some(discharged_at)) = (
            hospitalization.discharge_category,
            hospitalization.discharge_dttm,
        ) else {
            return DischargeOutcome::Unmatched;
        };
        if !window.contains(discharged_at) {
            return DischargeOutcome::NotHospitalDischarge;
        }
        match category {
            DischargeCategory::Expired => DischargeOutcome::Death,
            DischargeCategory::Hospice => DischargeOutcome::Hospice,
            category if category.is_facility() => DischargeOutcome::Facility,
            _ => DischargeOutcome::Other,
        }
    }

    pub fn classify(&self, discharges: &[&StayInterval], window: &DayWindow) -> DischargeOutcomes {
        let mut outcomes = DischargeOutcomes::default();
        for discharge in discharges {
            outcomes.record(self.classify_one(discharge, window));
        }
        outcomes
    }
}
