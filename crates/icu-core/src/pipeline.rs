//! Engine orchestration for one unit and reporting period.
//!
//! # Stage Order
//!
//! 1. **Index** - group events per hospitalization and sort them once
//! 2. **Census** - daily census, flow and discharge outcomes for the unit
//! 3. **Trials** - SBT and SAT rows for every ventilated day, merged per day
//! 4. **LPV** - low-tidal-volume adherence over the period
//! 5. **Summary** - period totals and rates
//!
//! # Example
//!
//! ```ignore
//! use icu_core::{QualityEngine, ReportContext};
//!
//! let ctx = ReportContext::new("Site A", "MICU", windows).with_bed_capacity(12);
//! let report = QualityEngine::new(&tables).run(&ctx);
//! ```

use std::time::Instant;

use chrono::TimeDelta;
use icu_model::{DailyMetricsRecord, EventTables, LpvSummary, QualitySummary, TrialDayRecord};
use tracing::{info, info_span};

use crate::census::{Cohort, CensusAggregator, TransferJoin, census_totals};
use crate::index::EventIndex;
use crate::merge::merge_trial_rows;
use crate::outcomes::OutcomeClassifier;
use crate::summary::{SummaryInputs, build_summary};
use crate::trials::{self, lpv};
use crate::window::DayWindows;

/// Default bounded lookahead for the floor-transfer join.
pub const DEFAULT_TRANSFER_LOOKAHEAD_HOURS: u32 = 24;

/// What to report on: site, unit, period and unit-level options.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub site_name: String,
    /// Exact ADT location name of the unit.
    pub location_name: String,
    pub windows: DayWindows,
    pub transfer_lookahead_hours: u32,
    pub bed_capacity: Option<u32>,
}

impl ReportContext {
    pub fn new(
        site_name: impl Into<String>,
        location_name: impl Into<String>,
        windows: DayWindows,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            location_name: location_name.into(),
            windows,
            transfer_lookahead_hours: DEFAULT_TRANSFER_LOOKAHEAD_HOURS,
            bed_capacity: None,
        }
    }

    pub fn with_transfer_lookahead_hours(mut self, hours: u32) -> Self {
        self.transfer_lookahead_hours = hours;
        self
    }

    pub fn with_bed_capacity(mut self, beds: u32) -> Self {
        self.bed_capacity = Some(beds);
        self
    }

    pub fn with_optional_bed_capacity(mut self, beds: Option<u32>) -> Self {
        self.bed_capacity = beds;
        self
    }

    pub fn transfer_lookahead(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.transfer_lookahead_hours))
    }
}

/// All engine outputs for one run.
#[derive(Debug, Clone)]
pub struct QualityReport {
    pub daily: Vec<DailyMetricsRecord>,
    pub unmatched_discharges: usize,
    pub trial_days: Vec<TrialDayRecord>,
    pub lpv: LpvSummary,
    pub summary: QualitySummary,
}

/// Runs every stage over one set of event tables.
///
/// The tables are indexed once and can be reported on for several units or
/// periods.
#[derive(Debug)]
pub struct QualityEngine<'a> {
    tables: &'a EventTables,
    index: EventIndex<'a>,
}

impl<'a> QualityEngine<'a> {
    pub fn new(tables: &'a EventTables) -> Self {
        Self {
            tables,
            index: EventIndex::build(tables),
        }
    }

    pub fn index(&self) -> &EventIndex<'a> {
        &self.index
    }

    pub fn run(&self, ctx: &ReportContext) -> QualityReport {
        let span = info_span!(
            "report",
            site = %ctx.site_name,
            unit = %ctx.location_name,
            start = %ctx.windows.first_date(),
            end = %ctx.windows.last_date()
        );
        let _guard = span.enter();
        let started = Instant::now();

        let cohort = Cohort::for_location(&self.tables.stays, &ctx.location_name);
        let aggregator = CensusAggregator::new(
            cohort,
            TransferJoin::new(&self.tables.stays, ctx.transfer_lookahead()),
            OutcomeClassifier::new(&self.tables.hospitalizations),
        );
        let daily = aggregator.daily_metrics(&ctx.windows);

        let rows = trials::evaluate(&self.index, &ctx.windows);
        let trial_days = merge_trial_rows(&rows.sbt, &rows.sat);

        let (period_start, period_end) = ctx.windows.period();
        let lpv = lpv::evaluate(&self.index, period_start, period_end);

        let summary = build_summary(SummaryInputs {
            site_name: &ctx.site_name,
            location_name: &ctx.location_name,
            period: (ctx.windows.first_date(), ctx.windows.last_date()),
            census: census_totals(&daily.records, ctx.bed_capacity),
            trial_days: &trial_days,
            lpv: lpv.clone(),
        });

        info!(
            days = daily.records.len(),
            trial_days = trial_days.len(),
            lpv_rows = lpv.total_controlled_mode_rows,
            duration_ms = started.elapsed().as_millis(),
            "report complete"
        );

        QualityReport {
            daily: daily.records,
            unmatched_discharges: daily.unmatched_discharges,
            trial_days,
            lpv,
            summary,
        }
    }
}
