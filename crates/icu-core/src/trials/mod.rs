//! Trial-eligibility evaluation per hospitalization-day.
//!
//! Rows are produced for every hospitalization and reporting day with
//! invasive ventilation in effect at the morning snapshot.

pub mod lpv;
pub mod sat;
pub mod sbt;

use icu_model::{SatDayRecord, SbtDayRecord};
use tracing::{info, info_span, trace};

use crate::index::EventIndex;
use crate::window::DayWindows;

pub use lpv::{LOW_TV_ML_PER_KG, LpvRecord, ideal_body_weight};

/// Breathing- and sedation-trial rows for the ventilated days.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialRows {
    pub sbt: Vec<SbtDayRecord>,
    pub sat: Vec<SatDayRecord>,
}

/// Evaluates both trials on every ventilated hospitalization-day.
///
/// Output is ordered by hospitalization id, then date.
pub fn evaluate(index: &EventIndex<'_>, windows: &DayWindows) -> TrialRows {
    let span = info_span!(
        "trials",
        hospitalizations = index.len(),
        days = windows.len()
    );
    let _guard = span.enter();

    let mut rows = TrialRows::default();
    for (id, timeline) in index.timelines() {
        if timeline.respiratory.is_empty() {
            continue;
        }
        let hospitalization = index.hospitalization(id);
        for window in windows {
            if !timeline.is_imv_at(window.morning()) {
                continue;
            }
            trace!(hospitalization_id = %id, day = %window.date, "ventilated day");
            rows.sbt
                .push(sbt::evaluate_day(id, timeline, hospitalization, &window));
            rows.sat.push(sat::evaluate_day(id, timeline, &window));
        }
    }

    info!(
        ventilated_days = rows.sbt.len(),
        sbt_eligible = rows.sbt.iter().filter(|r| r.sbt_eligible).count(),
        sat_eligible = rows.sat.iter().filter(|r| r.sat_eligible).count(),
        "trials complete"
    );
    rows
}
