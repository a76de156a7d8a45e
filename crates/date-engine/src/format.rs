//! Locale-aware time and date rendering.
//!
//! Field names, AM/PM markers and the locale's numeric date layout come from
//! chrono's locale tables (`format_localized`). Times of day are built from
//! the locale's own time layout with the seconds dropped, so `fi_FI` writes
//! `14.05` and `ja_JP` writes `14時05分`. Rendering never fails: a pattern
//! chrono cannot render for a locale falls back to the non-localized pattern,
//! then to RFC 3339.

use std::fmt::{Display, Write};

use chrono::{DateTime, Locale, NaiveDate};
use chrono_tz::Tz;

use crate::calendar::{self, CalendarDate};
use crate::clock::Instant;
use crate::settings::{DisplayPreference, FormatOptions};

/// Locale used when a tag is unknown.
pub const DEFAULT_LOCALE: Locale = Locale::en_US;

const LOCALE_DATE: &str = "%x";
const LOCALE_TIME: &str = "%X";
const LOCALE_TIME_12H: &str = "%r";

/// Locales listed by [`supported_locales`], keyed by their POSIX tag.
/// [`parse_locale`] accepts every locale chrono ships, not just these.
const SUPPORTED_LOCALES: &[(&str, Locale)] = &[
    ("POSIX", Locale::POSIX),
    ("ar_EG", Locale::ar_EG),
    ("cs_CZ", Locale::cs_CZ),
    ("da_DK", Locale::da_DK),
    ("de_AT", Locale::de_AT),
    ("de_CH", Locale::de_CH),
    ("de_DE", Locale::de_DE),
    ("el_GR", Locale::el_GR),
    ("en_AU", Locale::en_AU),
    ("en_CA", Locale::en_CA),
    ("en_GB", Locale::en_GB),
    ("en_IE", Locale::en_IE),
    ("en_IN", Locale::en_IN),
    ("en_NZ", Locale::en_NZ),
    ("en_US", Locale::en_US),
    ("es_ES", Locale::es_ES),
    ("es_MX", Locale::es_MX),
    ("fi_FI", Locale::fi_FI),
    ("fr_BE", Locale::fr_BE),
    ("fr_CA", Locale::fr_CA),
    ("fr_FR", Locale::fr_FR),
    ("he_IL", Locale::he_IL),
    ("hu_HU", Locale::hu_HU),
    ("id_ID", Locale::id_ID),
    ("it_IT", Locale::it_IT),
    ("ja_JP", Locale::ja_JP),
    ("ko_KR", Locale::ko_KR),
    ("nb_NO", Locale::nb_NO),
    ("nl_NL", Locale::nl_NL),
    ("pl_PL", Locale::pl_PL),
    ("pt_BR", Locale::pt_BR),
    ("pt_PT", Locale::pt_PT),
    ("ro_RO", Locale::ro_RO),
    ("ru_RU", Locale::ru_RU),
    ("sk_SK", Locale::sk_SK),
    ("sv_SE", Locale::sv_SE),
    ("th_TH", Locale::th_TH),
    ("tr_TR", Locale::tr_TR),
    ("uk_UA", Locale::uk_UA),
    ("vi_VN", Locale::vi_VN),
    ("zh_CN", Locale::zh_CN),
    ("zh_TW", Locale::zh_TW),
];

// ── Locale lookup ───────────────────────────────────────────────────────────

/// The locales this crate lists and checks its layouts against.
pub fn supported_locales() -> impl Iterator<Item = Locale> {
    SUPPORTED_LOCALES.iter().map(|(_, locale)| *locale)
}

/// Look up a locale tag such as `"en_US"`, `"en-US"`, `"es_AR.UTF-8"` or
/// `"sr_RS@latin"`.
///
/// Any locale in chrono's tables is accepted. A modifier the tables do not
/// know is dropped (`"de_DE@phone"` is `de_DE`). Returns `None` for tags
/// that name no known locale.
pub fn parse_locale(tag: &str) -> Option<Locale> {
    let tag = tag.trim();
    let (head, modifier) = match tag.split_once('@') {
        Some((head, modifier)) => (head, Some(modifier)),
        None => (tag, None),
    };
    // Codeset: "de_DE.UTF-8" → "de_DE"
    let base = head.split('.').next().unwrap_or(head);
    let mut parts = base.split(['_', '-']);
    let language = parts.next()?.to_ascii_lowercase();
    let normalized = match parts.next() {
        Some(region) => format!("{language}_{}", region.to_ascii_uppercase()),
        None if language == "posix" || language == "c" => "POSIX".to_string(),
        None => language,
    };
    if let Some(modifier) = modifier.filter(|m| !m.is_empty()) {
        let variant = format!("{normalized}@{}", modifier.to_ascii_lowercase());
        if let Ok(locale) = Locale::try_from(variant.as_str()) {
            return Some(locale);
        }
    }
    Locale::try_from(normalized.as_str()).ok()
}

/// Like [`parse_locale`], falling back to [`DEFAULT_LOCALE`] for unknown tags.
pub fn resolve_locale(tag: &str) -> Locale {
    parse_locale(tag).unwrap_or_else(|| {
        tracing::warn!(tag, fallback = ?DEFAULT_LOCALE, "unsupported locale, using default");
        DEFAULT_LOCALE
    })
}

/// 13:05:09, chosen so hour, minute and second never share digits.
fn sample_time() -> Option<DateTime<chrono::Utc>> {
    NaiveDate::from_ymd_opt(2014, 1, 3)
        .and_then(|d| d.and_hms_opt(13, 5, 9))
        .map(|dt| dt.and_utc())
}

/// Whether `locale` writes times on a 24-hour clock by convention.
///
/// Decided by rendering 13:05 with the locale's own time layout.
pub fn locale_uses_24_hour(locale: Locale) -> bool {
    sample_time()
        .and_then(|sample| try_render(&sample, LOCALE_TIME, locale))
        .is_some_and(|rendered| rendered.contains("13"))
}

// ── Clock layout ────────────────────────────────────────────────────────────

/// Where the AM/PM marker sits relative to the digits, with the text joining
/// the two.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Period {
    Before(String),
    After(String),
}

/// Hour-and-minute layout read off a locale's own time formats.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClockLayout {
    /// Text between hour and minute, already escaped for strftime.
    separator: String,
    /// Unit text after the minutes in layouts like `%H時%M分%S秒`.
    minute_suffix: String,
    period: Period,
}

impl Default for ClockLayout {
    fn default() -> Self {
        Self {
            separator: ":".to_string(),
            minute_suffix: String::new(),
            period: Period::After(" ".to_string()),
        }
    }
}

impl ClockLayout {
    fn for_locale(locale: Locale) -> Self {
        let Some(sample) = sample_time() else {
            return Self::default();
        };
        let mut layout = try_render(&sample, LOCALE_TIME, locale)
            .and_then(|rendered| Self::from_rendered_time(&rendered))
            .unwrap_or_default();
        let marker = try_render(&sample, "%p", locale).unwrap_or_default();
        if let Some(twelve_hour) = try_render(&sample, LOCALE_TIME_12H, locale) {
            layout.period = Period::from_rendered(twelve_hour.trim(), marker.trim());
        }
        layout
    }

    /// Parse a rendering of 13:05:09 (or 01:05:09) into separator and
    /// minute suffix.
    fn from_rendered_time(rendered: &str) -> Option<Self> {
        let minute = rendered.find("05")?;
        let head = &rendered[..minute];
        let hour_end = head.rfind(|c: char| c.is_ascii_digit())? + 1;
        let separator = &head[hour_end..];
        if separator.is_empty() {
            return None;
        }
        let tail = &rendered[minute + 2..];
        let minute_suffix = match tail.find("09") {
            Some(second) if tail[second + 2..].starts_with(|c: char| !c.is_whitespace()) => {
                tail[..second].trim_end()
            }
            _ => "",
        };
        Some(Self {
            separator: escape(separator),
            minute_suffix: escape(minute_suffix),
            period: Period::After(" ".to_string()),
        })
    }

    fn pattern(&self, hour: &str) -> String {
        format!("{hour}{}%M{}", self.separator, self.minute_suffix)
    }
}

impl Period {
    fn from_rendered(rendered: &str, marker: &str) -> Self {
        if marker.is_empty() {
            return Self::After(" ".to_string());
        }
        if let Some(rest) = rendered.strip_prefix(marker) {
            let joiner = rest.split(|c: char| c.is_ascii_digit()).next().unwrap_or("");
            return Self::Before(whitespace_or_space(joiner));
        }
        match rendered.find(marker) {
            Some(at) => {
                let head = &rendered[..at];
                let joiner = head
                    .rfind(|c: char| c.is_ascii_digit())
                    .map_or(" ", |digit| &head[digit + 1..]);
                Self::After(whitespace_or_space(joiner))
            }
            None => Self::After(" ".to_string()),
        }
    }
}

fn whitespace_or_space(joiner: &str) -> String {
    if joiner.chars().all(char::is_whitespace) {
        joiner.to_string()
    } else {
        " ".to_string()
    }
}

fn escape(literal: &str) -> String {
    literal.replace('%', "%%")
}

/// The AM/PM marker for `dt`. Locales without markers of their own use the
/// plain `AM`/`PM`, so 12-hour times always tell morning from evening.
fn day_period(dt: &DateTime<Tz>, locale: Locale) -> String {
    let localized = try_render(dt, "%p", locale).unwrap_or_default();
    let localized = localized.trim();
    if !localized.is_empty() {
        return localized.to_string();
    }
    display_string(dt.format("%p")).unwrap_or_default()
}

// ── Rendering ───────────────────────────────────────────────────────────────

fn display_string(value: impl Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{value}").ok()?;
    Some(out)
}

/// Render `dt` with `pattern` in `locale` without ever panicking.
fn render<Z>(dt: &DateTime<Z>, pattern: &str, locale: Locale) -> String
where
    Z: chrono::TimeZone,
    Z::Offset: Display,
{
    if let Some(rendered) = try_render(dt, pattern, locale) {
        return rendered;
    }
    tracing::warn!(pattern, ?locale, "locale cannot render pattern, using default layout");
    display_string(dt.format(pattern)).unwrap_or_else(|| dt.to_rfc3339())
}

fn try_render<Z>(dt: &DateTime<Z>, pattern: &str, locale: Locale) -> Option<String>
where
    Z: chrono::TimeZone,
    Z::Offset: Display,
{
    display_string(dt.format_localized(pattern, locale))
}

/// [`render`] for a bare date, with no zone or time involved.
fn render_date(date: NaiveDate, pattern: &str, locale: Locale) -> String {
    if let Some(rendered) = display_string(date.format_localized(pattern, locale)) {
        return rendered;
    }
    tracing::warn!(pattern, ?locale, "locale cannot render pattern, using default layout");
    display_string(date.format(pattern)).unwrap_or_else(|| date.to_string())
}

fn local(instant: Instant, options: &FormatOptions) -> DateTime<Tz> {
    calendar::to_local(instant, &options.timezone)
}

/// Whether `options` asks for 24-hour times, resolving the locale default.
pub fn uses_24_hour(options: &FormatOptions) -> bool {
    match options.preference {
        DisplayPreference::TwentyFourHour => true,
        DisplayPreference::TwelveHour => false,
        DisplayPreference::LocaleDefault => locale_uses_24_hour(options.locale),
    }
}

/// Time of day, e.g. `"14:05"` or `"2:05 PM"`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use date_engine::{format::time_string, DisplayPreference, FormatOptions};
///
/// let instant = Utc.with_ymd_and_hms(2014, 1, 3, 14, 5, 0).unwrap();
/// let options = FormatOptions::default().with_preference(DisplayPreference::TwentyFourHour);
/// assert_eq!(time_string(instant, &options), "14:05");
/// ```
pub fn time_string(instant: Instant, options: &FormatOptions) -> String {
    let dt = local(instant, options);
    let layout = ClockLayout::for_locale(options.locale);
    if uses_24_hour(options) {
        return render(&dt, &layout.pattern("%H"), options.locale)
            .trim()
            .to_string();
    }
    let clock = render(&dt, &layout.pattern("%-I"), options.locale);
    let clock = clock.trim();
    let period = day_period(&dt, options.locale);
    match &layout.period {
        Period::Before(joiner) => format!("{period}{joiner}{clock}"),
        Period::After(joiner) => format!("{clock}{joiner}{period}"),
    }
}

/// The locale's numeric date, e.g. `"01/03/2014"` for en_US.
pub fn date_string(instant: Instant, options: &FormatOptions) -> String {
    render(&local(instant, options), LOCALE_DATE, options.locale)
}

/// [`date_string`] for a date without a time. The date is rendered as is,
/// so it holds even in a zone where that day never happened.
pub fn calendar_date_string(date: CalendarDate, options: &FormatOptions) -> String {
    render_date(date.as_naive(), LOCALE_DATE, options.locale)
}

/// Date followed by time of day.
pub fn date_time_string(instant: Instant, options: &FormatOptions) -> String {
    format!(
        "{} {}",
        date_string(instant, options),
        time_string(instant, options)
    )
}

/// Localized weekday name, abbreviated when `short` is set.
pub fn weekday_name(instant: Instant, options: &FormatOptions, short: bool) -> String {
    let pattern = if short { "%a" } else { "%A" };
    render(&local(instant, options), pattern, options.locale)
}

/// Localized month name, abbreviated when `short` is set.
pub fn month_name(instant: Instant, options: &FormatOptions, short: bool) -> String {
    let pattern = if short { "%b" } else { "%B" };
    render(&local(instant, options), pattern, options.locale)
}

// ── Tests ───────────────────────────────────────────────────────────────────
