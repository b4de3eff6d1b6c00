//! Spontaneous awakening trial eligibility and delivery.

use chrono::TimeDelta;
use icu_model::{
    DrugCategory, HospitalizationId, Medication, SatDayRecord, SatOutcome, SedativeClass,
    Timestamp,
};

use crate::index::{Score, Timeline};
use crate::window::DayWindow;

/// A stopped infusion must stay off this long to count as cessation.
pub const RESTART_GRACE_MINUTES: i64 = 30;

/// Minimum span of agitated or awake scores.
pub const SUSTAINED_SCORE_MINUTES: i64 = 45;

/// A new dose at or below this share of the previous dose is a reduction.
pub const DOSE_REDUCTION_RATIO: f64 = 0.5;

fn sedating() -> impl Iterator<Item = Medication> {
    Medication::ALL.into_iter().filter(Medication::is_sedating)
}

fn paralytics() -> impl Iterator<Item = Medication> {
    Medication::ALL
        .into_iter()
        .filter(|med| med.category() == DrugCategory::Paralytic)
}

/// Propofol and benzodiazepines; opioids are left out.
fn sedatives_only() -> impl Iterator<Item = Medication> {
    sedating().filter(|med| {
        matches!(
            med.sedative_class(),
            Some(SedativeClass::Propofol | SedativeClass::Benzodiazepine)
        )
    })
}

/// Dose changes of `meds` inside the window, in time order.
fn changes_in(
    timeline: &Timeline<'_>,
    meds: &[Medication],
    window: &DayWindow,
) -> Vec<(Medication, usize)> {
    let mut found: Vec<(Medication, usize)> = meds
        .iter()
        .flat_map(|&med| {
            timeline
                .doses(med)
                .iter()
                .enumerate()
                .filter(|(_, change)| window.contains(change.at))
                .map(move |(i, _)| (med, i))
        })
        .collect();
    found.sort_by_key(|&(med, i)| (timeline.doses(med)[i].at, med));
    found
}

fn any_running_at(timeline: &Timeline<'_>, meds: &[Medication], t: Timestamp) -> bool {
    meds.iter().any(|&med| timeline.dose_at(med, t) > 0.0)
}

/// Some drug in `meds` restarts in `(t, t + grace]`.
fn restarts_within(timeline: &Timeline<'_>, meds: &[Medication], t: Timestamp) -> bool {
    let limit = t + TimeDelta::minutes(RESTART_GRACE_MINUTES);
    meds.iter().any(|&med| {
        timeline
            .doses(med)
            .iter()
            .any(|change| change.at > t && change.at <= limit && change.dose > 0.0)
    })
}

/// All of `meds` reach zero in the window and stay off for the grace period.
fn ceased(timeline: &Timeline<'_>, meds: &[Medication], window: &DayWindow) -> bool {
    changes_in(timeline, meds, window).into_iter().any(|(med, i)| {
        let at = timeline.doses(med)[i].at;
        !any_running_at(timeline, meds, at) && !restarts_within(timeline, meds, at)
    })
}

/// A dose falls to half or less while the RASS in effect is positive.
fn reduced_while_agitated(timeline: &Timeline<'_>, meds: &[Medication], window: &DayWindow) -> bool {
    changes_in(timeline, meds, window).into_iter().any(|(med, i)| {
        let changes = timeline.doses(med);
        let change = changes[i];
        let previous = if i > 0 { changes[i - 1].dose } else { 0.0 };
        previous > 0.0
            && change.dose <= DOSE_REDUCTION_RATIO * previous
            && timeline.rass_at(change.at).is_some_and(|rass| rass > 0.0)
    })
}

/// A change of any dose in `[from, to]`.
fn dose_changed_between(timeline: &Timeline<'_>, meds: &[Medication], from: Timestamp, to: Timestamp) -> bool {
    meds.iter().any(|&med| {
        let changes = timeline.doses(med);
        changes.iter().enumerate().any(|(i, change)| {
            let previous = if i > 0 { changes[i - 1].dose } else { 0.0 };
            change.at >= from && change.at <= to && change.dose != previous
        })
    })
}

fn scores_in<'t>(timeline: &'t Timeline<'_>, window: &DayWindow) -> &'t [Score] {
    let lo = timeline.scores.partition_point(|s| s.at < window.start);
    let hi = timeline.scores.partition_point(|s| s.at < window.end);
    &timeline.scores[lo..hi]
}

/// Consecutive agitated scores spanning the sustained period with no dose
/// change.
fn agitated_without_change(timeline: &Timeline<'_>, meds: &[Medication], window: &DayWindow) -> bool {
    let scores = scores_in(timeline, window);
    let span = TimeDelta::minutes(SUSTAINED_SCORE_MINUTES);
    (0..scores.len()).any(|start| {
        let first = scores[start];
        scores[start..]
            .iter()
            .take_while(|score| score.rass > 0.0)
            .find(|score| score.at - first.at >= span)
            .is_some_and(|last| first.rass > 0.0 && !dose_changed_between(timeline, meds, first.at, last.at))
    })
}

/// A sedated score followed by non-negative scores spanning the sustained
/// period.
fn sedated_then_awake(timeline: &Timeline<'_>, window: &DayWindow) -> bool {
    let scores = scores_in(timeline, window);
    let span = TimeDelta::minutes(SUSTAINED_SCORE_MINUTES);
    scores.windows(2).enumerate().any(|(i, pair)| {
        if !(pair[0].rass < 0.0 && pair[1].rass >= 0.0) {
            return false;
        }
        let awake_from = pair[1].at;
        scores[i + 1..]
            .iter()
            .take_while(|score| score.rass >= 0.0)
            .any(|score| score.at - awake_from >= span)
    })
}

/// The single delivery outcome for an eligible day, checked in priority order.
pub fn classify_outcome(timeline: &Timeline<'_>, window: &DayWindow) -> Option<SatOutcome> {
    let sedating: Vec<Medication> = sedating().collect();
    let sedatives: Vec<Medication> = sedatives_only().collect();

    if ceased(timeline, &sedating, window) {
        return Some(SatOutcome::CompleteCessation);
    }
    if any_running_at(timeline, &sedatives, window.morning()) && ceased(timeline, &sedatives, window)
    {
        return Some(SatOutcome::SedativeCessation);
    }
    if reduced_while_agitated(timeline, &sedating, window) {
        return Some(SatOutcome::DoseReductionAgitated);
    }
    if agitated_without_change(timeline, &sedating, window) {
        return Some(SatOutcome::NoChangeAgitated);
    }
    if sedated_then_awake(timeline, window) {
        return Some(SatOutcome::SedatedToAwake);
    }
    None
}

/// Any paralytic running at some instant of the window.
fn paralyzed_during(timeline: &Timeline<'_>, window: &DayWindow) -> bool {
    paralytics().any(|med| {
        timeline.dose_at(med, window.start) > 0.0
            || timeline
                .doses(med)
                .iter()
                .any(|change| window.contains(change.at) && change.dose > 0.0)
    })
}

pub fn is_eligible(timeline: &Timeline<'_>, window: &DayWindow) -> bool {
    let morning = window.morning();
    let sedating: Vec<Medication> = sedating().collect();
    timeline.is_imv_at(morning)
        && timeline.in_icu_at(morning)
        && any_running_at(timeline, &sedating, morning)
        && !timeline.trials_excluded_at(morning)
        && !paralyzed_during(timeline, window)
}

pub fn evaluate_day(
    hospitalization_id: &HospitalizationId,
    timeline: &Timeline<'_>,
    window: &DayWindow,
) -> SatDayRecord {
    let sat_eligible = is_eligible(timeline, window);
    SatDayRecord {
        hospitalization_id: hospitalization_id.clone(),
        date: window.date,
        sat_eligible,
        outcome: sat_eligible
            .then(|| classify_outcome(timeline, window))
            .flatten(),
    }
}
