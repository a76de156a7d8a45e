//! Zone-aware calendar arithmetic.
//!
//! Every calendar field (year, month, day, time-of-day) is read by converting
//! an [`Instant`] into a time zone with [`to_local`], and every computed local
//! date-time is turned back into an instant with [`from_local`]. Nothing here
//! shifts raw epoch milliseconds by a fixed-size day or month.
//!
//! # DST handling
//!
//! A local date-time that falls into a DST gap is read with the UTC offset in
//! force before the gap, which moves it forward by the length of the gap
//! (02:30 in a 02:00-03:00 gap becomes 03:30). A gap that starts at midnight
//! therefore resolves to the first valid local time of the day. One that
//! falls into a DST overlap resolves to the earliest of its two instants.

use std::fmt;

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;

use crate::clock::Instant;
use crate::error::{DateError, Result};

// ── Gregorian rules ─────────────────────────────────────────────────────────

/// Proleptic Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`, or `None` for a month outside
/// 1-12.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return None,
    };
    Some(days)
}

// ── CalendarDate ────────────────────────────────────────────────────────────

/// A valid proleptic Gregorian date. Months and days are 1-based.
///
/// There is no way to build a `CalendarDate` for a day that does not exist:
/// [`CalendarDate::new`] rejects April 31 instead of rolling it into May.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from a 1-based month and day.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidMonth`] when `month` is outside 1-12, and
    /// [`DateError::InvalidDate`] when `day` does not exist in that month.
    ///
    /// # Examples
    ///
    /// ```
    /// use date_engine::CalendarDate;
    ///
    /// assert!(CalendarDate::new(2016, 2, 29).is_ok());
    /// assert!(CalendarDate::new(2014, 4, 31).is_err());
    /// ```
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// The local date of `instant` in `tz`.
    pub fn from_instant(instant: Instant, tz: &Tz) -> Self {
        Self(to_local(instant, tz).date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1-based month.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn days_in_month(&self) -> u32 {
        // month() is always 1-12 for a constructed date
        days_in_month(self.year(), self.month()).unwrap_or(31)
    }

    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    pub fn first_of_month(&self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    pub fn last_of_month(&self) -> Self {
        Self(self.0.with_day(self.days_in_month()).unwrap_or(self.0))
    }

    /// The following day, or `None` past the last representable date.
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The preceding day, or `None` before the first representable date.
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The start of this date in `tz` (see module docs for DST gaps).
    pub fn start_in(&self, tz: &Tz) -> Instant {
        from_local(self.0.and_time(NaiveTime::MIN), tz)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Whether `date` is the last day of its month.
pub fn is_end_of_month(date: CalendarDate) -> bool {
    date.is_end_of_month()
}

// ── Zone conversion ─────────────────────────────────────────────────────────

/// View `instant` in `tz`. The single path for reading calendar fields.
pub fn to_local(instant: Instant, tz: &Tz) -> DateTime<Tz> {
    instant.with_timezone(tz)
}

/// Resolve a local date-time in `tz` to an instant.
///
/// Ambiguous local times pick the earliest instant. Nonexistent ones are read
/// with the offset in force before the gap, so they land the length of the
/// gap later on the wall clock.
pub fn from_local(naive: NaiveDateTime, tz: &Tz) -> Instant {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let offset = offset_before_gap(naive, tz);
            match naive.checked_sub_signed(Duration::seconds(offset.into())) {
                Some(utc) => Utc.from_utc_datetime(&utc),
                None => {
                    tracing::warn!(
                        %naive,
                        tz = %tz.name(),
                        "gap time out of range, reading as UTC"
                    );
                    Utc.from_utc_datetime(&naive)
                }
            }
        }
    }
}

/// UTC offset in seconds that `tz` observed just before the gap containing
/// `naive`. Zone offsets stay within a day of UTC, so a day earlier read as
/// UTC is always on the near side of the transition.
fn offset_before_gap(naive: NaiveDateTime, tz: &Tz) -> i32 {
    let before = naive.checked_sub_signed(Duration::days(1)).unwrap_or(naive);
    tz.offset_from_utc_datetime(&before).fix().local_minus_utc()
}

// ── Day arithmetic ──────────────────────────────────────────────────────────

/// The first instant of `instant`'s local day in `tz`.
///
/// Truncation happens on calendar fields, so the result is correct on days
/// that are 23 or 25 hours long. `start_of_day(start_of_day(x)) ==
/// start_of_day(x)`.
pub fn start_of_day(instant: Instant, tz: &Tz) -> Instant {
    CalendarDate::from_instant(instant, tz).start_in(tz)
}

/// The last millisecond of `instant`'s local day in `tz`.
pub fn end_of_day(instant: Instant, tz: &Tz) -> Instant {
    let date = to_local(instant, tz).date_naive();
    match NaiveTime::from_hms_milli_opt(23, 59, 59, 999) {
        Some(time) => from_local(date.and_time(time), tz),
        None => start_of_day(instant, tz),
    }
}

/// Shift `instant` by whole calendar days in `tz`, keeping its wall-clock
/// time. Returns `None` when the result is not representable.
pub fn add_days(instant: Instant, days: i64, tz: &Tz) -> Option<Instant> {
    let local = to_local(instant, tz).naive_local();
    let shifted = if days >= 0 {
        local.checked_add_days(Days::new(days.unsigned_abs()))?
    } else {
        local.checked_sub_days(Days::new(days.unsigned_abs()))?
    };
    Some(from_local(shifted, tz))
}

/// Whole calendar days from the local date of `from` to the local date of
/// `to`. Negative when `to` is on an earlier day.
pub fn days_between(from: Instant, to: Instant, tz: &Tz) -> i64 {
    let from = to_local(from, tz).date_naive();
    let to = to_local(to, tz).date_naive();
    to.signed_duration_since(from).num_days()
}

// ── Month arithmetic ────────────────────────────────────────────────────────

/// What to do when the day-of-month does not exist in the target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MonthOverflow {
    /// Carry the surplus days into the following month
    /// (2014-01-31 + 1 month = 2014-03-03).
    #[default]
    Roll,
    /// Clamp to the last day of the target month
    /// (2014-01-31 + 1 month = 2014-02-28).
    Clamp,
}

/// Move `instant` by `months` calendar months in `tz`, keeping its
/// time-of-day. Returns `None` when the result is not representable.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use date_engine::calendar::{add_months, MonthOverflow};
///
/// let jan31 = Utc.with_ymd_and_hms(2014, 1, 31, 12, 0, 0).unwrap();
/// let rolled = add_months(jan31, 1, &chrono_tz::UTC, MonthOverflow::Roll).unwrap();
/// assert_eq!(rolled, Utc.with_ymd_and_hms(2014, 3, 3, 12, 0, 0).unwrap());
/// ```
pub fn add_months(
    instant: Instant,
    months: i32,
    tz: &Tz,
    overflow: MonthOverflow,
) -> Option<Instant> {
    let local = to_local(instant, tz);
    let date = local.date_naive();

    let month_index =
        i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month = u32::try_from(month_index.rem_euclid(12)).ok()? + 1;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let target = match overflow {
        MonthOverflow::Roll => first.checked_add_days(Days::new(u64::from(date.day() - 1)))?,
        MonthOverflow::Clamp => {
            let last = days_in_month(year, month)?;
            first.with_day(date.day().min(last))?
        }
    };

    Some(from_local(target.and_time(local.time()), tz))
}

/// One calendar month after `anchor`, rolling surplus days forward.
///
/// Saturates at the latest representable instant.
pub fn one_month_from(anchor: Instant, tz: &Tz) -> Instant {
    add_months(anchor, 1, tz, MonthOverflow::Roll).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// ── Tests ───────────────────────────────────────────────────────────────────
