//! Data model for the ICU quality metrics engine.
//!
//! - **events**: typed source events (ADT intervals, medications, RASS, ...)
//! - **records**: per-day output rows
//! - **summary**: reporting-period totals and rates
//! - **metric**: rounded values with an explicit `N/A` marker
//! - **config**: site configuration
//! - **time**: wall-clock localization

pub mod config;
pub mod enums;
pub mod error;
pub mod events;
pub mod ids;
pub mod metric;
pub mod records;
pub mod summary;
pub mod time;

pub use config::{FileType, ReportOptions, SiteConfig};
pub use enums::{
    CodeStatusCategory, DeviceCategory, DischargeCategory, DrugCategory, LocationCategory,
    Medication, ModeCategory, SedativeClass, SexCategory,
};
pub use error::{ModelError, Result};
pub use events::{
    AssessmentEvent, CodeStatusEvent, EventTables, Hospitalization, MedicationEvent, Patient,
    RespiratorySupportRecord, StayInterval, Timestamp, VitalSignEvent,
};
pub use ids::{HospitalizationId, SubjectId};
pub use metric::{Metric, NOT_APPLICABLE, Rate};
pub use records::{
    Columns, DailyMetricsRecord, LpvModeRow, SatDayRecord, SatOutcome, SbtDayRecord,
    TrialDayRecord,
};
pub use summary::{CensusTotals, LpvSummary, QualitySummary, SatSummary, SbtSummary};
pub use time::localize;
