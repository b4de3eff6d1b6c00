//! Wall-clock localization in the site timezone.

use chrono::{NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::events::Timestamp;

/// Localizes a wall-clock time in `tz`.
///
/// Ambiguous times (fall-back overlap) resolve to the earlier instant. Times
/// inside a spring-forward gap move forward by one hour.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Timestamp {
    if let Some(local) = tz.from_local_datetime(&naive).earliest() {
        return local;
    }
    let shifted = naive + TimeDelta::hours(1);
    tz.from_local_datetime(&shifted)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Chicago;

    fn naive(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_localize_plain_time() {
        let ts = localize(naive("2024-01-01 07:00:00"), Chicago);
        assert_eq!(ts.naive_utc(), naive("2024-01-01 13:00:00"));
    }

    #[test]
    fn test_localize_gap_moves_forward() {
        // 2024-03-10 02:30 does not exist in Chicago.
        let ts = localize(naive("2024-03-10 02:30:00"), Chicago);
        assert_eq!(ts.naive_local(), naive("2024-03-10 03:30:00"));
    }

    #[test]
    fn test_localize_overlap_takes_earlier() {
        // 01:30 happens twice on 2024-11-03; the first is CDT.
        let ts = localize(naive("2024-11-03 01:30:00"), Chicago);
        assert_eq!(ts.naive_utc(), naive("2024-11-03 06:30:00"));
    }
}
