//! Lung-protective ventilation adherence.

use std::collections::BTreeMap;

use icu_model::{
    LpvModeRow, LpvSummary, Metric, ModeCategory, RespiratorySupportRecord, SexCategory,
    Timestamp,
};
use tracing::debug;

use crate::index::EventIndex;

/// Set tidal volumes under this many mL per kg of ideal body weight are low.
pub const LOW_TV_ML_PER_KG: f64 = 8.0;

const HEIGHT_BASE_CM: f64 = 152.0;
const KG_PER_CM: f64 = 0.9;

/// Devine-style ideal body weight in kg; `None` without a usable sex.
pub fn ideal_body_weight(sex: SexCategory, height_cm: f64) -> Option<f64> {
    let base = match sex {
        SexCategory::Female => 45.5,
        SexCategory::Male => 50.0,
        SexCategory::Unknown => return None,
    };
    Some(base + KG_PER_CM * (height_cm - HEIGHT_BASE_CM))
}

/// Classification of one controlled-mode record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LpvRecord {
    /// Height, sex or set tidal volume missing, or a non-positive IBW.
    Invalid,
    Valid { ml_per_kg: f64 },
}

impl LpvRecord {
    pub fn classify(
        record: &RespiratorySupportRecord,
        sex: Option<SexCategory>,
        height_cm: Option<f64>,
    ) -> Self {
        let ibw = sex
            .zip(height_cm)
            .and_then(|(sex, height)| ideal_body_weight(sex, height));
        match (ibw, record.tidal_volume_set) {
            (Some(ibw), Some(tidal_volume)) if ibw > 0.0 => LpvRecord::Valid {
                ml_per_kg: tidal_volume / ibw,
            },
            _ => LpvRecord::Invalid,
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self, LpvRecord::Valid { ml_per_kg } if *ml_per_kg < LOW_TV_ML_PER_KG)
    }

    pub fn ml_per_kg(&self) -> Option<f64> {
        match self {
            LpvRecord::Valid { ml_per_kg } => Some(*ml_per_kg),
            LpvRecord::Invalid => None,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    total: usize,
    valid: usize,
    low: usize,
}

impl Tally {
    fn add(&mut self, record: LpvRecord) {
        self.total += 1;
        if record.ml_per_kg().is_some() {
            self.valid += 1;
        }
        if record.is_low() {
            self.low += 1;
        }
    }
}

/// Controlled-mode IMV records recorded in `[start, end)`.
pub fn evaluate(index: &EventIndex<'_>, start: Timestamp, end: Timestamp) -> LpvSummary {
    let mut overall = Tally::default();
    let mut by_mode: BTreeMap<ModeCategory, Tally> = BTreeMap::new();
    let mut ratios = Vec::new();

    for (id, timeline) in index.timelines() {
        let sex = index.sex(id);
        let height = timeline.height_cm();
        for record in &timeline.respiratory {
            if record.recorded < start || record.recorded >= end || !record.is_controlled() {
                continue;
            }
            let Some(mode) = record.mode else {
                continue;
            };
            let classified = LpvRecord::classify(record, sex, height);
            overall.add(classified);
            by_mode.entry(mode).or_default().add(classified);
            ratios.extend(classified.ml_per_kg());
        }
    }

    if overall.valid < overall.total {
        debug!(
            invalid = overall.total - overall.valid,
            "controlled-mode records without height, sex or tidal volume"
        );
    }

    LpvSummary {
        total_controlled_mode_rows: overall.total,
        rows_with_valid_data: overall.valid,
        low_tv_rows: overall.low,
        low_tv_percentage: Metric::percentage(overall.low, overall.valid),
        median_ml_per_kg: Metric::median(&ratios),
        by_mode: by_mode
            .into_iter()
            .map(|(mode, tally)| LpvModeRow {
                mode_category: mode.as_str().to_string(),
                total_rows: tally.total,
                valid_rows: tally.valid,
                low_tv_rows: tally.low,
                low_tv_pct: Metric::percentage(tally.low, tally.valid),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_body_weight() {
        assert_eq!(ideal_body_weight(SexCategory::Female, 172.0), Some(63.5));
        assert_eq!(ideal_body_weight(SexCategory::Male, 172.0), Some(68.0));
        assert_eq!(ideal_body_weight(SexCategory::Unknown, 172.0), None);
    }

    #[test]
    fn test_ibw_can_be_non_positive() {
        let ibw = ideal_body_weight(SexCategory::Female, 100.0).unwrap();
        assert!(ibw < 0.0);
    }
}
