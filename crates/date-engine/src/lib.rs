//! # date-engine
//!
//! Deterministic due-date computation for task scheduling.
//!
//! Recurring tasks and due dates break quietly when calendar arithmetic is
//! done on raw milliseconds: months differ in length, leap years move the
//! end of February, and DST makes some days 23 or 25 hours long. This crate
//! keeps that arithmetic in one place and renders the results for display.
//!
//! ## Modules
//!
//! - [`clock`] — Injectable "now": system, fixed and freezable clocks
//! - [`calendar`] — Start of day, end-of-month checks, month and day offsets
//! - [`relative`] — "today" / "tmrw" / "yesterday" labels
//! - [`format`] — Locale-aware time and date strings
//! - [`settings`] — 12h/24h preference, locale and zone configuration
//! - [`context`] — A clock and display options bound together
//! - [`error`] — Error types

pub mod calendar;
pub mod clock;
pub mod context;
pub mod error;
pub mod format;
pub mod relative;
pub mod settings;

pub use calendar::{
    add_days, add_months, days_between, days_in_month, end_of_day, is_end_of_month,
    is_leap_year, one_month_from, start_of_day, CalendarDate, MonthOverflow,
};
#[cfg(any(test, feature = "test-seams"))]
pub use clock::FreezeGuard;
pub use clock::{Clock, FixedClock, Instant, SharedClock, SystemClock};
pub use context::DateContext;
pub use error::DateError;
pub use format::{date_string, supported_locales, time_string};
pub use relative::{relative_day, RelativeDay};
pub use settings::{DisplayPreference, DisplaySettings, FormatOptions, RelativeDayLabels};
