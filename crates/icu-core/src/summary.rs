//! Reporting-period summary.

use std::collections::BTreeSet;

use icu_model::{
    CensusTotals, LpvSummary, QualitySummary, Rate, SatOutcome, SatSummary, SbtSummary,
    TrialDayRecord,
};

/// SAT outcome rates over SAT-eligible days.
pub fn sat_summary(rows: &[TrialDayRecord]) -> SatSummary {
    let eligible: Vec<&TrialDayRecord> = rows.iter().filter(|r| r.sat_eligible).collect();
    let rate = |outcome: SatOutcome| {
        let hits = eligible
            .iter()
            .filter(|r| r.sat_outcome() == Some(outcome))
            .count();
        Rate::new(hits, eligible.len())
    };
    SatSummary {
        eligible_days: eligible.len(),
        complete_cessation: rate(SatOutcome::CompleteCessation),
        sedative_cessation: rate(SatOutcome::SedativeCessation),
        dose_reduction: rate(SatOutcome::DoseReductionAgitated),
        no_change_agitated: rate(SatOutcome::NoChangeAgitated),
        sedated_to_awake: rate(SatOutcome::SedatedToAwake),
    }
}

/// SBT and extubation rates over SBT-eligible days.
pub fn sbt_summary(rows: &[TrialDayRecord]) -> SbtSummary {
    let eligible: Vec<&TrialDayRecord> = rows.iter().filter(|r| r.sbt_eligible).collect();
    let count = |flag: fn(&TrialDayRecord) -> bool| eligible.iter().filter(|r| flag(r)).count();
    SbtSummary {
        eligible_days: eligible.len(),
        pressure_support_trial: Rate::new(count(|r| r.sbt_done), eligible.len()),
        successful_extubation: Rate::new(count(|r| r.success_extub), eligible.len()),
        failed_extubation: Rate::new(count(|r| r.fail_extub), eligible.len()),
        first_extubations: count(|r| r.extub_1st),
        tracheostomies: count(|r| r.trach_1st),
    }
}

/// Everything shown on the quality report for one unit and period.
#[derive(Debug, Clone)]
pub struct SummaryInputs<'a> {
    pub site_name: &'a str,
    pub location_name: &'a str,
    pub period: (chrono::NaiveDate, chrono::NaiveDate),
    pub census: CensusTotals,
    pub trial_days: &'a [TrialDayRecord],
    pub lpv: LpvSummary,
}

pub fn build_summary(inputs: SummaryInputs<'_>) -> QualitySummary {
    let hospitalizations = inputs
        .trial_days
        .iter()
        .map(|r| &r.hospitalization_id)
        .collect::<BTreeSet<_>>()
        .len();
    QualitySummary {
        site_name: inputs.site_name.to_string(),
        location_name: inputs.location_name.to_string(),
        period_start: inputs.period.0,
        period_end: inputs.period.1,
        census: inputs.census,
        trial_days: inputs.trial_days.len(),
        hospitalizations,
        sat: sat_summary(inputs.trial_days),
        sbt: sbt_summary(inputs.trial_days),
        lpv: inputs.lpv,
    }
}
