//! Day-window generation.
//!
//! A reporting day runs from the anchor hour on its calendar date to the
//! anchor hour on the next date. Each anchor is localized from its own
//! wall-clock time, so a window spanning a DST change lasts 23 or 25 hours.

use chrono::{Days, NaiveDate, NaiveTime, TimeDelta};
use chrono_tz::Tz;
use icu_model::{ReportOptions, Timestamp, localize};

use crate::error::{EngineError, Result};

/// Anchor and snapshot hours in a site timezone.
///
/// Hours are checked on construction and always lie in `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPolicy {
    timezone: Tz,
    anchor_hour: u32,
    snapshot_hours: [u32; 2],
}

impl WindowPolicy {
    /// 07:00 anchor with 07:00 and 19:00 snapshots.
    pub fn new(timezone: Tz) -> Self {
        let defaults = ReportOptions::default();
        Self {
            timezone,
            anchor_hour: defaults.anchor_hour,
            snapshot_hours: defaults.snapshot_hours,
        }
    }

    pub fn with_hours(timezone: Tz, anchor_hour: u32, snapshot_hours: [u32; 2]) -> Result<Self> {
        let options = ReportOptions {
            anchor_hour,
            snapshot_hours,
            ..ReportOptions::default()
        };
        Self::from_options(timezone, &options)
    }

    pub fn from_options(timezone: Tz, options: &ReportOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            timezone,
            anchor_hour: options.anchor_hour,
            snapshot_hours: options.snapshot_hours,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn anchor_hour(&self) -> u32 {
        self.anchor_hour
    }

    pub fn snapshot_hours(&self) -> [u32; 2] {
        self.snapshot_hours
    }

    fn at(&self, date: NaiveDate, hour: u32) -> Timestamp {
        let wall = date.and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(hour));
        localize(wall, self.timezone)
    }

    /// Window labelled `date`.
    pub fn window(&self, date: NaiveDate) -> DayWindow {
        let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
        let snapshot = |hour: u32| {
            // Hours before the anchor belong to the next calendar date.
            let day = if hour < self.anchor_hour { next } else { date };
            self.at(day, hour)
        };
        DayWindow {
            date,
            start: self.at(date, self.anchor_hour),
            end: self.at(next, self.anchor_hour),
            snapshots: [
                snapshot(self.snapshot_hours[0]),
                snapshot(self.snapshot_hours[1]),
            ],
        }
    }
}

/// One anchored reporting day, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Morning and evening census instants, both inside the window.
    pub snapshots: [Timestamp; 2],
}

impl DayWindow {
    pub fn contains(&self, t: Timestamp) -> bool {
        self.start <= t && t < self.end
    }

    /// The 7AM snapshot under the default policy.
    pub fn morning(&self) -> Timestamp {
        self.snapshots[0]
    }

    /// The 7PM snapshot under the default policy.
    pub fn evening(&self) -> Timestamp {
        self.snapshots[1]
    }
}

/// Inclusive range of reporting days.
///
/// Cheap to clone; every call to [`DayWindows::iter`] restarts at the first
/// day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayWindows {
    policy: WindowPolicy,
    first: NaiveDate,
    last: NaiveDate,
}

impl DayWindows {
    pub fn new(first: NaiveDate, last: NaiveDate, policy: WindowPolicy) -> Result<Self> {
        if first > last {
            return Err(EngineError::InvalidPeriod {
                start: first,
                end: last,
            });
        }
        Ok(Self {
            policy,
            first,
            last,
        })
    }

    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last
    }

    pub fn len(&self) -> usize {
        usize::try_from((self.last - self.first).num_days() + 1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start of the first window through end of the last.
    pub fn period(&self) -> (Timestamp, Timestamp) {
        (
            self.policy.window(self.first).start,
            self.policy.window(self.last).end,
        )
    }

    pub fn iter(&self) -> DayWindowIter {
        DayWindowIter {
            policy: self.policy,
            next: Some(self.first),
            last: self.last,
        }
    }
}

impl IntoIterator for &DayWindows {
    type Item = DayWindow;
    type IntoIter = DayWindowIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over [`DayWindow`]s.
#[derive(Debug, Clone)]
pub struct DayWindowIter {
    policy: WindowPolicy,
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl Iterator for DayWindowIter {
    type Item = DayWindow;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.next?;
        self.next = date
            .checked_add_days(Days::new(1))
            .filter(|next| *next <= self.last);
        Some(self.policy.window(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use chrono_tz::America::Chicago;
    use icu_model::ModelError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_period() {
        let windows = DayWindows::new(date(2024, 1, 1), date(2024, 1, 1), WindowPolicy::new(Chicago))
            .unwrap();
        let all: Vec<_> = windows.iter().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(windows.len(), 1);
        assert_eq!(all[0].start.hour(), 7);
        assert_eq!(all[0].end.day(), 2);
    }

    #[test]
    fn test_reversed_period_is_rejected() {
        let result = DayWindows::new(date(2024, 1, 3), date(2024, 1, 1), WindowPolicy::new(Chicago));
        assert!(matches!(result, Err(EngineError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_iteration_restarts() {
        let windows = DayWindows::new(date(2024, 1, 1), date(2024, 1, 3), WindowPolicy::new(Chicago))
            .unwrap();
        let first: Vec<_> = windows.iter().map(|w| w.date).collect();
        let second: Vec<_> = (&windows).into_iter().map(|w| w.date).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
    }

    #[test]
    fn test_snapshots_before_anchor_move_to_next_date() {
        let policy = WindowPolicy::with_hours(Chicago, 7, [7, 3]).unwrap();
        let window = policy.window(date(2024, 1, 1));
        assert_eq!(window.evening().day(), 2);
        assert!(window.contains(window.evening()));
    }

    #[test]
    fn test_out_of_range_hours_are_rejected() {
        let anchor = WindowPolicy::with_hours(Chicago, 24, [7, 19]);
        assert!(matches!(
            anchor,
            Err(EngineError::Model(ModelError::InvalidHour { field: "anchor_hour", value: 24 }))
        ));
        assert!(WindowPolicy::with_hours(Chicago, 7, [7, 31]).is_err());

        let policy = WindowPolicy::with_hours(Chicago, 23, [23, 6]).unwrap();
        assert_eq!(policy.window(date(2024, 1, 1)).start.hour(), 23);
    }
}
