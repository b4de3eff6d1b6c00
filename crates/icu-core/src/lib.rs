//! Temporal aggregation and eligibility engine for ICU quality metrics.
//!
//! - **window**: anchored day-windows in the site timezone
//! - **census**: unit census, admissions, discharges and floor transfers
//! - **outcomes**: discharge outcome classification
//! - **trials**: SBT, SAT and lung-protective ventilation
//! - **merge**: per hospitalization-day join of trial rows
//! - **pipeline**: the engine entry point

pub mod census;
pub mod error;
pub mod index;
pub mod merge;
pub mod outcomes;
pub mod pipeline;
pub mod summary;
pub mod trials;
pub mod window;

pub use census::{CensusAggregator, Cohort, DailyMetrics, TransferJoin, census_totals};
pub use error::{EngineError, Result};
pub use index::{DoseChange, EventIndex, Score, Timeline};
pub use merge::merge_trial_rows;
pub use outcomes::{DischargeOutcome, DischargeOutcomes, OutcomeClassifier};
pub use pipeline::{QualityEngine, QualityReport, ReportContext};
pub use summary::{build_summary, sat_summary, sbt_summary};
pub use trials::{LOW_TV_ML_PER_KG, LpvRecord, TrialRows, ideal_body_weight};
pub use window::{DayWindow, DayWindowIter, DayWindows, WindowPolicy};
