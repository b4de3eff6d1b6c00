//! Spontaneous breathing trial and extubation flags.

use icu_model::{
    DischargeCategory, Hospitalization, HospitalizationId, ModeCategory,
    RespiratorySupportRecord, SbtDayRecord, Timestamp,
};

use crate::index::Timeline;
use crate::window::DayWindow;

/// Pressure support below this level (cmH2O) counts as a breathing trial.
pub const SBT_PRESSURE_SUPPORT_MAX: f64 = 10.0;

/// IMV in Pressure Support/CPAP with pressure support under the threshold.
pub fn is_trial_setting(record: &RespiratorySupportRecord) -> bool {
    record.is_invasive()
        && record.mode == Some(ModeCategory::PressureSupportCpap)
        && record
            .pressure_support_set
            .is_some_and(|ps| ps < SBT_PRESSURE_SUPPORT_MAX)
}

/// Leaving IMV for another recorded device without a tracheostomy.
fn is_extubation(previous: &RespiratorySupportRecord, current: &RespiratorySupportRecord) -> bool {
    previous.is_invasive()
        && current.device.is_some()
        && !current.is_invasive()
        && !current.tracheostomy
}

/// Times of every extubation in the hospitalization.
fn extubations(records: &[RespiratorySupportRecord]) -> Vec<Timestamp> {
    records
        .windows(2)
        .filter(|pair| is_extubation(&pair[0], &pair[1]))
        .map(|pair| pair[1].recorded)
        .collect()
}

fn died_before(hospitalization: Option<&Hospitalization>, t: Timestamp) -> bool {
    hospitalization.is_some_and(|h| {
        h.discharge_category == Some(DischargeCategory::Expired)
            && h.discharge_dttm.is_some_and(|at| at < t)
    })
}

/// Evaluates one ventilated day.
///
/// All outcome flags stay false unless the day is eligible: on IMV in a
/// controlled mode at the morning snapshot with no disqualifying code status.
pub fn evaluate_day(
    hospitalization_id: &HospitalizationId,
    timeline: &Timeline<'_>,
    hospitalization: Option<&Hospitalization>,
    window: &DayWindow,
) -> SbtDayRecord {
    let morning = window.morning();
    let evening = window.evening();
    let mut row = SbtDayRecord {
        hospitalization_id: hospitalization_id.clone(),
        date: window.date,
        sbt_eligible: false,
        sbt_done: false,
        extub_1st: false,
        success_extub: false,
        fail_extub: false,
        trach_1st: false,
        sbt_first_dttm: None,
    };

    let controlled = timeline
        .respiratory_at(morning)
        .is_some_and(RespiratorySupportRecord::is_controlled);
    row.sbt_eligible = controlled && !timeline.trials_excluded_at(morning);
    if !row.sbt_eligible {
        return row;
    }

    let records = &timeline.respiratory;
    let lo = records.partition_point(|r| r.recorded < window.start);
    let hi = records.partition_point(|r| r.recorded < window.end);

    row.sbt_first_dttm = (lo..hi)
        .find(|&i| {
            is_trial_setting(&records[i]) && !(i > 0 && is_trial_setting(&records[i - 1]))
        })
        .map(|i| records[i].recorded.fixed_offset());
    row.sbt_done = row.sbt_first_dttm.is_some();

    let all_extubations = extubations(records);
    let first_extubation = all_extubations.first().copied();
    row.extub_1st = first_extubation.is_some_and(|at| window.contains(at));

    if let Some(extubated_at) = all_extubations.iter().copied().find(|at| window.contains(*at)) {
        row.fail_extub = records[lo..hi]
            .iter()
            .any(|r| r.recorded > extubated_at && r.is_invasive());
        row.success_extub = !row.fail_extub
            && extubated_at < evening
            && !timeline.is_imv_at(evening)
            && timeline.last_vital.is_some_and(|last| last >= evening)
            && !died_before(hospitalization, evening);
    }

    let first_trach = records.iter().find(|r| r.tracheostomy).map(|r| r.recorded);
    row.trach_1st = first_trach.is_some_and(|at| {
        window.contains(at) && first_extubation.is_none_or(|extubated| extubated >= at)
    });

    row
}
