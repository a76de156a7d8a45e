//! "Now"-relative entry points bound to a clock and display options.

use crate::calendar::{self, CalendarDate};
use crate::clock::{Clock, Instant, SharedClock};
use crate::format;
use crate::relative;
use crate::settings::FormatOptions;

/// A [`Clock`] plus the [`FormatOptions`] a caller renders with.
///
/// The free functions in [`calendar`], [`format`] and [`relative`] take
/// every input explicitly; this type supplies "now" and the options.
#[derive(Debug, Clone)]
pub struct DateContext<C: Clock = SharedClock> {
    clock: C,
    options: FormatOptions,
}

impl<C: Clock> DateContext<C> {
    pub fn new(clock: C, options: FormatOptions) -> Self {
        Self { clock, options }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn today(&self) -> CalendarDate {
        CalendarDate::from_instant(self.now(), &self.options.timezone)
    }

    pub fn start_of_today(&self) -> Instant {
        calendar::start_of_day(self.now(), &self.options.timezone)
    }

    /// Same time of day one calendar month from now; surplus days roll into
    /// the following month.
    pub fn one_month_from_now(&self) -> Instant {
        calendar::one_month_from(self.now(), &self.options.timezone)
    }

    /// Label `instant` relative to today. `short` defaults to `true` in
    /// [`Self::relative_day_short`].
    pub fn relative_day(&self, instant: Instant, short: bool) -> String {
        relative::relative_day(instant, self.now(), &self.options, short)
    }

    pub fn relative_day_short(&self, instant: Instant) -> String {
        self.relative_day(instant, true)
    }

    pub fn time_string(&self, instant: Instant) -> String {
        format::time_string(instant, &self.options)
    }

    pub fn date_string(&self, instant: Instant) -> String {
        format::date_string(instant, &self.options)
    }

    pub fn date_time_string(&self, instant: Instant) -> String {
        format::date_time_string(instant, &self.options)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::settings::{DisplayPreference, DisplaySettings};
    use chrono::{Duration, NaiveDate, TimeZone, Timelike, Utc};

    fn utc_ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> Instant {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
            .and_utc()
    }

    fn shared() -> DateContext {
        DateContext::new(SharedClock::new(), FormatOptions::default())
    }

    #[test]
    fn test_one_month_from_start_of_december() {
        let ctx = shared();
        ctx.clock()
            .freeze_at(utc_ms(2013, 12, 1, 12, 19, 45, 192))
            .thaw_after(|| {
                assert_eq!(ctx.one_month_from_now(), utc_ms(2014, 1, 1, 12, 19, 45, 192));
            });
    }

    #[test]
    fn test_one_month_from_end_of_december() {
        let ctx = shared();
        ctx.clock()
            .freeze_at(utc_ms(2013, 12, 31, 16, 31, 20, 597))
            .thaw_after(|| {
                assert_eq!(ctx.one_month_from_now(), utc_ms(2014, 1, 31, 16, 31, 20, 597));
            });
    }

    #[test]
    fn test_one_month_from_end_of_january() {
        let ctx = shared();
        ctx.clock()
            .freeze_at(utc_ms(2014, 1, 31, 12, 54, 33, 175))
            .thaw_after(|| {
                assert_eq!(ctx.one_month_from_now(), utc_ms(2014, 3, 3, 12, 54, 33, 175));
            });
    }

    #[test]
    fn test_one_month_from_end_of_february() {
        let ctx = shared();
        ctx.clock()
            .freeze_at(utc_ms(2014, 2, 28, 9, 19, 7, 990))
            .thaw_after(|| {
                assert_eq!(ctx.one_month_from_now(), utc_ms(2014, 3, 28, 9, 19, 7, 990));
            });
    }

    #[test]
    fn test_relative_day_with_frozen_clock() {
        let ctx = shared();
        ctx.clock().freeze().thaw_after(|| {
            let today = ctx.now();
            let tomorrow = calendar::add_days(today, 1, &chrono_tz::UTC).unwrap();
            let yesterday = calendar::add_days(today, -1, &chrono_tz::UTC).unwrap();
            assert_eq!(ctx.relative_day_short(today), "today");
            assert_eq!(ctx.relative_day(today, false), "today");
            assert_eq!(ctx.relative_day_short(tomorrow), "tmrw");
            assert_eq!(ctx.relative_day(tomorrow, false), "tomorrow");
            assert_eq!(ctx.relative_day_short(yesterday), "yest");
            assert_eq!(ctx.relative_day(yesterday, false), "yesterday");
        });
        assert!(!ctx.clock().is_frozen());
    }

    #[test]
    fn test_start_of_today_and_today() {
        let clock = FixedClock::new(utc_ms(2014, 1, 3, 10, 34, 32, 98));
        let ctx = DateContext::new(clock, FormatOptions::default());
        assert_eq!(ctx.start_of_today(), utc_ms(2014, 1, 3, 0, 0, 0, 0));
        assert_eq!(ctx.today(), CalendarDate::new(2014, 1, 3).unwrap());
        let start = ctx.start_of_today();
        assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));
    }

    #[test]
    fn test_context_from_settings() {
        let options = DisplaySettings::from_json(
            r#"{ "timezone": "America/New_York", "locale": "en_US", "use_24_hour": false }"#,
        )
        .unwrap()
        .resolve()
        .unwrap();
        assert_eq!(options.preference, DisplayPreference::TwelveHour);
        let now = Utc.with_ymd_and_hms(2014, 1, 3, 3, 15, 0).unwrap();
        let ctx = DateContext::new(FixedClock::new(now), options);
        // 22:15 EST on Jan 2
        assert_eq!(ctx.time_string(now), "10:15 PM");
        assert_eq!(ctx.date_string(now), "01/02/2014");
        assert_eq!(ctx.date_time_string(now), "01/02/2014 10:15 PM");
        assert_eq!(ctx.relative_day_short(now + Duration::hours(2)), "tmrw");
    }

    #[test]
    fn test_fixed_clock_steps_change_relative_day() {
        let mut clock = FixedClock::new(utc_ms(2014, 1, 3, 12, 0, 0, 0));
        let due = utc_ms(2014, 1, 4, 9, 0, 0, 0);
        let ctx = DateContext::new(clock, FormatOptions::default());
        assert_eq!(ctx.relative_day_short(due), "tmrw");
        clock.advance(Duration::days(1));
        let ctx = DateContext::new(clock, FormatOptions::default());
        assert_eq!(ctx.relative_day_short(due), "today");
    }
}
