//! Labels for dates relative to today ("today", "tmrw", "yesterday", ...).

use serde::Serialize;

use crate::calendar;
use crate::clock::Instant;
use crate::format;
use crate::settings::FormatOptions;

/// Where an instant falls relative to an anchor day, in whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelativeDay {
    Yesterday,
    Today,
    Tomorrow,
    /// Any other offset; negative means in the past.
    Other(i64),
}

impl RelativeDay {
    /// Classify `instant` against the local day of `anchor` in `tz`.
    pub fn between(anchor: Instant, instant: Instant, tz: &chrono_tz::Tz) -> Self {
        Self::from_offset(calendar::days_between(anchor, instant, tz))
    }

    pub fn from_offset(days: i64) -> Self {
        match days {
            -1 => Self::Yesterday,
            0 => Self::Today,
            1 => Self::Tomorrow,
            n => Self::Other(n),
        }
    }

    pub fn offset(&self) -> i64 {
        match self {
            Self::Yesterday => -1,
            Self::Today => 0,
            Self::Tomorrow => 1,
            Self::Other(n) => *n,
        }
    }
}

/// Label `instant` relative to the day containing `anchor`.
///
/// `short` picks the compact widget form ("tmrw", "yest"). Days other than
/// yesterday, today and tomorrow render as [`format::date_string`].
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use date_engine::{relative::relative_day, FormatOptions};
///
/// let now = Utc.with_ymd_and_hms(2014, 1, 3, 10, 0, 0).unwrap();
/// let options = FormatOptions::default();
/// assert_eq!(relative_day(now + Duration::days(1), now, &options, true), "tmrw");
/// assert_eq!(relative_day(now + Duration::days(1), now, &options, false), "tomorrow");
/// ```
pub fn relative_day(
    instant: Instant,
    anchor: Instant,
    options: &FormatOptions,
    short: bool,
) -> String {
    let labels = &options.labels;
    match RelativeDay::between(anchor, instant, &options.timezone) {
        RelativeDay::Today => labels.today.clone(),
        RelativeDay::Tomorrow if short => labels.tomorrow_short.clone(),
        RelativeDay::Tomorrow => labels.tomorrow.clone(),
        RelativeDay::Yesterday if short => labels.yesterday_short.clone(),
        RelativeDay::Yesterday => labels.yesterday.clone(),
        RelativeDay::Other(_) => format::date_string(instant, options),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RelativeDayLabels;
    use chrono::{Duration, TimeZone, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    fn anchor() -> Instant {
        Utc.with_ymd_and_hms(2014, 1, 3, 10, 41, 41).unwrap()
    }

    #[test]
    fn test_relative_day_today() {
        let options = FormatOptions::default();
        assert_eq!(relative_day(anchor(), anchor(), &options, true), "today");
        assert_eq!(relative_day(anchor(), anchor(), &options, false), "today");
        let late = Utc.with_ymd_and_hms(2014, 1, 3, 23, 59, 59).unwrap();
        assert_eq!(relative_day(late, anchor(), &options, true), "today");
    }

    #[test]
    fn test_relative_day_tomorrow() {
        let options = FormatOptions::default();
        let tomorrow = anchor() + Duration::days(1);
        assert_eq!(relative_day(tomorrow, anchor(), &options, true), "tmrw");
        assert_eq!(relative_day(tomorrow, anchor(), &options, false), "tomorrow");
    }

    #[test]
    fn test_relative_day_yesterday() {
        let options = FormatOptions::default();
        let yesterday = anchor() - Duration::days(1);
        assert_eq!(relative_day(yesterday, anchor(), &options, true), "yest");
        assert_eq!(relative_day(yesterday, anchor(), &options, false), "yesterday");
    }

    #[test]
    fn test_relative_day_falls_through_to_date() {
        let options = FormatOptions::default();
        let later = anchor() + Duration::days(2);
        assert_eq!(relative_day(later, anchor(), &options, true), "01/05/2014");
        let far = Utc.with_ymd_and_hms(1999, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(relative_day(far, anchor(), &options, false), "12/31/1999");
    }

    #[test]
    fn test_relative_day_counts_calendar_days_not_hours() {
        let options = FormatOptions::default();
        // 23:30 and 00:30 the next day are one hour apart but different days
        let late = Utc.with_ymd_and_hms(2014, 1, 3, 23, 30, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2014, 1, 4, 0, 30, 0).unwrap();
        assert_eq!(relative_day(early, late, &options, true), "tmrw");
        assert_eq!(relative_day(late, early, &options, false), "yesterday");
    }

    #[test]
    fn test_relative_day_across_dst() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let options = FormatOptions::default().with_timezone(tz);
        // 23:30 EST on Mar 7 → 23:30 EDT on Mar 8, only 23 hours later
        let before = Utc.with_ymd_and_hms(2026, 3, 8, 4, 30, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 3, 9, 3, 30, 0).unwrap();
        assert_eq!(relative_day(after, before, &options, false), "tomorrow");
    }

    #[test]
    fn test_relative_day_custom_labels() {
        let labels = RelativeDayLabels {
            today: "heute".to_string(),
            tomorrow: "morgen".to_string(),
            tomorrow_short: "morg.".to_string(),
            yesterday: "gestern".to_string(),
            yesterday_short: "gest.".to_string(),
        };
        let options = FormatOptions::default().with_labels(labels);
        assert_eq!(relative_day(anchor(), anchor(), &options, true), "heute");
        assert_eq!(
            relative_day(anchor() + Duration::days(1), anchor(), &options, true),
            "morg."
        );
    }

    #[test]
    fn test_relative_day_offsets() {
        assert_eq!(RelativeDay::from_offset(0), RelativeDay::Today);
        assert_eq!(RelativeDay::from_offset(-3), RelativeDay::Other(-3));
        assert_eq!(RelativeDay::Yesterday.offset(), -1);
        assert_eq!(RelativeDay::Other(7).offset(), 7);
    }

    proptest! {
        #[test]
        fn prop_adjacent_days_classify(secs in 86_400i64..4_102_444_800) {
            let tz: Tz = "Europe/London".parse().unwrap();
            let now = chrono::DateTime::from_timestamp(secs, 0).unwrap();
            let tomorrow = calendar::add_days(now, 1, &tz).unwrap();
            let yesterday = calendar::add_days(now, -1, &tz).unwrap();
            prop_assert_eq!(RelativeDay::between(now, now, &tz), RelativeDay::Today);
            prop_assert_eq!(RelativeDay::between(now, tomorrow, &tz), RelativeDay::Tomorrow);
            prop_assert_eq!(RelativeDay::between(now, yesterday, &tz), RelativeDay::Yesterday);
        }
    }
}
