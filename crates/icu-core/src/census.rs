//! Census and patient flow for one unit.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use icu_model::{
    CensusTotals, DailyMetricsRecord, HospitalizationId, Metric, StayInterval, Timestamp,
};
use tracing::{debug, info_span, trace};

use crate::outcomes::{DischargeOutcomes, OutcomeClassifier};
use crate::window::{DayWindow, DayWindows};

/// Stay intervals in one location.
#[derive(Debug, Clone)]
pub struct Cohort<'a> {
    location_name: String,
    intervals: Vec<&'a StayInterval>,
}

impl<'a> Cohort<'a> {
    /// Intervals whose location name equals `location_name` exactly.
    pub fn for_location(stays: &'a [StayInterval], location_name: &str) -> Self {
        let intervals = stays
            .iter()
            .filter(|stay| stay.location_name == location_name)
            .collect();
        Self {
            location_name: location_name.to_string(),
            intervals,
        }
    }

    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Intervals starting in `[start, end)` of the window.
    pub fn admissions(&self, window: &DayWindow) -> usize {
        self.intervals
            .iter()
            .filter(|stay| window.contains(stay.start))
            .count()
    }

    /// Intervals present at `t`: `start <= t` and not yet ended.
    pub fn census_at(&self, t: Timestamp) -> usize {
        self.intervals.iter().filter(|stay| stay.contains(t)).count()
    }

    /// Intervals ending in `[start, end)` of the window.
    pub fn discharges(&self, window: &DayWindow) -> Vec<&'a StayInterval> {
        self.intervals
            .iter()
            .filter(|stay| stay.end.is_some_and(|end| window.contains(end)))
            .copied()
            .collect()
    }
}

/// Bounded lookahead from a discharge to the next stay of the same
/// hospitalization.
#[derive(Debug)]
pub struct TransferJoin<'a> {
    by_hospitalization: BTreeMap<&'a HospitalizationId, Vec<&'a StayInterval>>,
    lookahead: TimeDelta,
}

impl<'a> TransferJoin<'a> {
    /// Indexes every stay, in any location, ordered by `(start, id)`.
    pub fn new(stays: &'a [StayInterval], lookahead: TimeDelta) -> Self {
        let mut by_hospitalization: BTreeMap<&'a HospitalizationId, Vec<&'a StayInterval>> =
            BTreeMap::new();
        for stay in stays {
            by_hospitalization
                .entry(&stay.hospitalization_id)
                .or_default()
                .push(stay);
        }
        for intervals in by_hospitalization.values_mut() {
            intervals.sort_by_key(|stay| (stay.start, stay.id));
        }
        Self {
            by_hospitalization,
            lookahead,
        }
    }

    /// First other stay starting in `[end, end + lookahead]`.
    pub fn next_stay(&self, discharged: &StayInterval) -> Option<&'a StayInterval> {
        let end = discharged.end?;
        let limit = end + self.lookahead;
        let intervals = self.by_hospitalization.get(&discharged.hospitalization_id)?;
        let first = intervals.partition_point(|stay| stay.start < end);
        intervals[first..]
            .iter()
            .take_while(|stay| stay.start <= limit)
            .find(|stay| stay.id != discharged.id)
            .copied()
    }

    /// The next stay is a ward or stepdown bed.
    pub fn is_floor_transfer(&self, discharged: &StayInterval) -> bool {
        self.next_stay(discharged)
            .and_then(|next| next.location_category)
            .is_some_and(|category| category.is_floor())
    }
}

/// Daily census, flow and outcome counts for a unit.
#[derive(Debug)]
pub struct CensusAggregator<'a> {
    cohort: Cohort<'a>,
    transfers: TransferJoin<'a>,
    outcomes: OutcomeClassifier<'a>,
}

/// Daily rows plus discharges that could not be matched to an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyMetrics {
    pub records: Vec<DailyMetricsRecord>,
    pub unmatched_discharges: usize,
}

impl<'a> CensusAggregator<'a> {
    pub fn new(
        cohort: Cohort<'a>,
        transfers: TransferJoin<'a>,
        outcomes: OutcomeClassifier<'a>,
    ) -> Self {
        Self {
            cohort,
            transfers,
            outcomes,
        }
    }

    pub fn cohort(&self) -> &Cohort<'a> {
        &self.cohort
    }

    pub fn day(&self, window: &DayWindow) -> (DailyMetricsRecord, DischargeOutcomes) {
        let discharged = self.cohort.discharges(window);
        let floor_transfers = discharged
            .iter()
            .filter(|stay| self.transfers.is_floor_transfer(stay))
            .count();
        let outcomes = self.outcomes.classify(&discharged, window);
        let record = DailyMetricsRecord {
            location_name: self.cohort.location_name.clone(),
            date: window.date,
            admissions: self.cohort.admissions(window),
            census_7am: self.cohort.census_at(window.morning()),
            census_7pm: self.cohort.census_at(window.evening()),
            discharges: discharged.len(),
            floor_transfers,
            deaths: outcomes.deaths,
            hospice: outcomes.hospice,
            facility: outcomes.facility,
        };
        (record, outcomes)
    }

    pub fn daily_metrics(&self, windows: &DayWindows) -> DailyMetrics {
        let span = info_span!(
            "census",
            unit = %self.cohort.location_name,
            intervals = self.cohort.len(),
            days = windows.len()
        );
        let _guard = span.enter();

        let mut records = Vec::with_capacity(windows.len());
        let mut unmatched_discharges = 0usize;
        for window in windows {
            let (record, outcomes) = self.day(&window);
            trace!(
                day = %record.date,
                admissions = record.admissions,
                census_7am = record.census_7am,
                census_7pm = record.census_7pm,
                discharges = record.discharges,
                "daily census"
            );
            unmatched_discharges += outcomes.unmatched;
            records.push(record);
        }
        if unmatched_discharges > 0 {
            debug!(unmatched_discharges, "discharges without an outcome record");
        }
        DailyMetrics {
            records,
            unmatched_discharges,
        }
    }
}

/// Sums and averages daily rows over the reporting period.
///
/// Bed strain is the mean 7AM census over the configured bed count.
pub fn census_totals(records: &[DailyMetricsRecord], bed_capacity: Option<u32>) -> CensusTotals {
    let sum = |field: fn(&DailyMetricsRecord) -> usize| records.iter().map(field).sum::<usize>();
    let mean_7am = mean(records.iter().map(|r| r.census_7am));
    let bed_strain_pct = match (mean_7am, bed_capacity) {
        (Some(mean), Some(beds)) if beds > 0 => Metric::from_value(100.0 * mean / f64::from(beds)),
        _ => Metric::NotApplicable,
    };
    CensusTotals {
        days: records.len(),
        total_admissions: sum(|r| r.admissions),
        daily_census: mean_7am.map_or(Metric::NotApplicable, Metric::from_value),
        mean_census_7pm: Metric::mean(records.iter().map(|r| r.census_7pm as f64)),
        total_discharges: sum(|r| r.discharges),
        floor_transfers: sum(|r| r.floor_transfers),
        deaths_in_icu: sum(|r| r.deaths),
        discharges_to_hospice: sum(|r| r.hospice),
        discharges_to_facility: sum(|r| r.facility),
        bed_strain_pct,
    }
}

fn mean(values: impl Iterator<Item = usize>) -> Option<f64> {
    let (total, count) = values.fold((0usize, 0usize), |(total, count), v| (total + v, count + 1));
    (count > 0).then(|| total as f64 / count as f64)
}
