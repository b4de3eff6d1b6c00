//! Per-hospitalization timelines.
//!
//! Events are grouped by hospitalization and sorted by timestamp once. The
//! state "in effect at t" is the latest record with a timestamp at or before
//! `t`; equal timestamps keep their source order, so the later row wins.
//!
//! Respiratory rows that chart settings only inherit the last recorded
//! device, and the last mode while the device is unchanged.

use std::collections::BTreeMap;

use icu_model::{
    CodeStatusCategory, EventTables, Hospitalization, HospitalizationId, LocationCategory,
    Medication, RespiratorySupportRecord, SexCategory, StayInterval, SubjectId, Timestamp,
    VitalSignEvent,
};

/// A continuous-infusion rate taking effect at `at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseChange {
    pub at: Timestamp,
    pub dose: f64,
}

/// A RASS score recorded at `at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub at: Timestamp,
    pub rass: f64,
}

/// Index of the last item whose key is at or before `t`.
fn latest_index<T>(items: &[T], t: Timestamp, key: impl Fn(&T) -> Timestamp) -> Option<usize> {
    items.partition_point(|item| key(item) <= t).checked_sub(1)
}

/// Fills missing device and mode from the previous row of a sorted slice.
fn carry_forward(records: &[&RespiratorySupportRecord]) -> Vec<RespiratorySupportRecord> {
    let mut filled: Vec<RespiratorySupportRecord> = Vec::with_capacity(records.len());
    for record in records {
        let mut record = (*record).clone();
        if let Some(previous) = filled.last() {
            if record.device.is_none() {
                record.device = previous.device;
            }
            if record.mode.is_none() && record.device == previous.device {
                record.mode = previous.mode;
            }
        }
        filled.push(record);
    }
    filled
}

/// Time-ordered events of one hospitalization.
#[derive(Debug, Default)]
pub struct Timeline<'a> {
    pub stays: Vec<&'a StayInterval>,
    /// Sorted, with device and mode carried forward.
    pub respiratory: Vec<RespiratorySupportRecord>,
    pub medications: BTreeMap<Medication, Vec<DoseChange>>,
    pub scores: Vec<Score>,
    pub code_statuses: Vec<(Timestamp, Option<CodeStatusCategory>)>,
    /// Latest vital sign of any kind.
    pub last_vital: Option<Timestamp>,
    /// Latest recorded height and when it was taken.
    pub height: Option<(Timestamp, f64)>,
}

impl<'a> Timeline<'a> {
    pub fn respiratory_at(&self, t: Timestamp) -> Option<&RespiratorySupportRecord> {
        latest_index(&self.respiratory, t, |r| r.recorded).map(|i| &self.respiratory[i])
    }

    pub fn is_imv_at(&self, t: Timestamp) -> bool {
        self.respiratory_at(t).is_some_and(RespiratorySupportRecord::is_invasive)
    }

    /// Dose in effect at `t`; zero before the first record.
    pub fn dose_at(&self, medication: Medication, t: Timestamp) -> f64 {
        self.medications
            .get(&medication)
            .and_then(|changes| latest_index(changes, t, |c| c.at).map(|i| changes[i].dose))
            .unwrap_or(0.0)
    }

    pub fn doses(&self, medication: Medication) -> &[DoseChange] {
        self.medications
            .get(&medication)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn code_status_at(&self, t: Timestamp) -> Option<CodeStatusCategory> {
        latest_index(&self.code_statuses, t, |c| c.0).and_then(|i| self.code_statuses[i].1)
    }

    /// Whether the code status in effect at `t` rules out trials.
    pub fn trials_excluded_at(&self, t: Timestamp) -> bool {
        self.code_status_at(t)
            .is_some_and(|status| status.disqualifies_trials())
    }

    pub fn location_at(&self, t: Timestamp) -> Option<&'a StayInterval> {
        self.stays.iter().rev().find(|stay| stay.contains(t)).copied()
    }

    pub fn in_icu_at(&self, t: Timestamp) -> bool {
        self.location_at(t)
            .is_some_and(|stay| stay.location_category == Some(LocationCategory::Icu))
    }

    pub fn height_cm(&self) -> Option<f64> {
        self.height.map(|(_, cm)| cm)
    }

    pub fn rass_at(&self, t: Timestamp) -> Option<f64> {
        latest_index(&self.scores, t, |s| s.at).map(|i| self.scores[i].rass)
    }
}

/// Events of every hospitalization, sorted once for the trial evaluators.
#[derive(Debug, Default)]
pub struct EventIndex<'a> {
    timelines: BTreeMap<&'a HospitalizationId, Timeline<'a>>,
    hospitalizations: BTreeMap<&'a HospitalizationId, &'a Hospitalization>,
    sexes: BTreeMap<&'a SubjectId, SexCategory>,
}

impl<'a> EventIndex<'a> {
    pub fn build(tables: &'a EventTables) -> Self {
        let mut timelines: BTreeMap<&'a HospitalizationId, Timeline<'a>> = BTreeMap::new();

        for stay in &tables.stays {
            timelines
                .entry(&stay.hospitalization_id)
                .or_default()
                .stays
                .push(stay);
        }
        let mut respiratory: BTreeMap<&'a HospitalizationId, Vec<&'a RespiratorySupportRecord>> =
            BTreeMap::new();
        for record in &tables.respiratory {
            respiratory
                .entry(&record.hospitalization_id)
                .or_default()
                .push(record);
        }
        for (id, mut records) in respiratory {
            records.sort_by_key(|record| record.recorded);
            timelines.entry(id).or_default().respiratory = carry_forward(&records);
        }
        for event in &tables.medications {
            timelines
                .entry(&event.hospitalization_id)
                .or_default()
                .medications
                .entry(event.medication)
                .or_default()
                .push(DoseChange {
                    at: event.recorded,
                    dose: event.effective_dose(),
                });
        }
        for event in &tables.assessments {
            timelines
                .entry(&event.hospitalization_id)
                .or_default()
                .scores
                .push(Score {
                    at: event.recorded,
                    rass: event.rass,
                });
        }
        for event in &tables.code_statuses {
            timelines
                .entry(&event.hospitalization_id)
                .or_default()
                .code_statuses
                .push((event.start, event.category));
        }
        for vital in &tables.vitals {
            let timeline = timelines.entry(&vital.hospitalization_id).or_default();
            record_vital(timeline, vital);
        }

        for timeline in timelines.values_mut() {
            timeline.stays.sort_by_key(|stay| (stay.start, stay.id));
            for changes in timeline.medications.values_mut() {
                changes.sort_by_key(|change| change.at);
            }
            timeline.scores.sort_by_key(|score| score.at);
            timeline.code_statuses.sort_by_key(|status| status.0);
        }

        let hospitalizations = tables
            .hospitalizations
            .iter()
            .map(|h| (&h.hospitalization_id, h))
            .collect();
        let sexes = tables
            .patients
            .iter()
            .filter_map(|p| p.sex.map(|sex| (&p.subject_id, sex)))
            .collect();

        Self {
            timelines,
            hospitalizations,
            sexes,
        }
    }

    pub fn timeline(&self, id: &HospitalizationId) -> Option<&Timeline<'a>> {
        self.timelines.get(id)
    }

    /// Timelines in hospitalization id order.
    pub fn timelines(&self) -> impl Iterator<Item = (&'a HospitalizationId, &Timeline<'a>)> {
        self.timelines.iter().map(|(id, timeline)| (*id, timeline))
    }

    pub fn hospitalization(&self, id: &HospitalizationId) -> Option<&'a Hospitalization> {
        self.hospitalizations.get(id).copied()
    }

    /// Sex of the patient behind a hospitalization.
    pub fn sex(&self, id: &HospitalizationId) -> Option<SexCategory> {
        let hospitalization = self.hospitalization(id)?;
        self.sexes.get(&hospitalization.subject_id).copied()
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }
}

fn record_vital(timeline: &mut Timeline<'_>, vital: &VitalSignEvent) {
    if timeline.last_vital.is_none_or(|last| vital.recorded > last) {
        timeline.last_vital = Some(vital.recorded);
    }
    if vital.category != VitalSignEvent::HEIGHT_CM {
        return;
    }
    if let Some(height) = vital.value
        && timeline.height.is_none_or(|(at, _)| vital.recorded >= at)
    {
        timeline.height = Some((vital.recorded, height));
    }
}
