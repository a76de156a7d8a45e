//! Display configuration.
//!
//! The host application owns the settings surface and hands this crate a
//! [`DisplaySettings`] value (usually deserialized from its JSON settings).
//! [`DisplaySettings::resolve`] turns it into the [`FormatOptions`] that the
//! formatters take explicitly. No formatter reads process-wide state.

use chrono::Locale;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{DateError, Result};
use crate::format::{self, DEFAULT_LOCALE};

/// The user's 12-hour / 24-hour choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPreference {
    /// Whatever the locale writes by convention.
    #[default]
    LocaleDefault,
    TwelveHour,
    TwentyFourHour,
}

impl DisplayPreference {
    /// Map the host's optional "use 24-hour time" flag.
    pub fn from_override(use_24_hour: Option<bool>) -> Self {
        match use_24_hour {
            None => Self::LocaleDefault,
            Some(true) => Self::TwentyFourHour,
            Some(false) => Self::TwelveHour,
        }
    }
}

/// Words used for days adjacent to today. Hosts supply their translated
/// string resources here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeDayLabels {
    pub today: String,
    pub tomorrow: String,
    pub tomorrow_short: String,
    pub yesterday: String,
    pub yesterday_short: String,
}

impl Default for RelativeDayLabels {
    fn default() -> Self {
        Self {
            today: "today".to_string(),
            tomorrow: "tomorrow".to_string(),
            tomorrow_short: "tmrw".to_string(),
            yesterday: "yesterday".to_string(),
            yesterday_short: "yest".to_string(),
        }
    }
}

/// Settings as the host stores them.
///
/// Every field is optional in the serialized form:
///
/// ```json
/// { "timezone": "Europe/Berlin", "locale": "de_DE", "use_24_hour": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// IANA time zone used for every calendar-field extraction.
    pub timezone: String,
    /// Locale tag, e.g. `"en_US"`.
    pub locale: String,
    /// `None` follows the locale; `Some` forces 24-hour or 12-hour time.
    pub use_24_hour: Option<bool>,
    pub labels: RelativeDayLabels,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            locale: "en_US".to_string(),
            use_24_hour: None,
            labels: RelativeDayLabels::default(),
        }
    }
}

impl DisplaySettings {
    /// Parse the host's JSON settings payload.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidSettings`] if the payload is not valid JSON
    /// for this shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DateError::InvalidSettings(e.to_string()))
    }

    /// Resolve names into the values formatters use.
    ///
    /// An unknown locale degrades to [`DEFAULT_LOCALE`]; date display must
    /// not block scheduling.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidTimezone`] if `timezone` is not an IANA
    /// zone name.
    pub fn resolve(&self) -> Result<FormatOptions> {
        Ok(FormatOptions {
            timezone: parse_timezone(&self.timezone)?,
            locale: format::resolve_locale(&self.locale),
            preference: DisplayPreference::from_override(self.use_24_hour),
            labels: self.labels.clone(),
        })
    }
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| DateError::InvalidTimezone(format!("'{}'", s)))
}

/// Resolved display configuration, passed explicitly to every formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    pub timezone: Tz,
    pub locale: Locale,
    pub preference: DisplayPreference,
    pub labels: RelativeDayLabels,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            locale: DEFAULT_LOCALE,
            preference: DisplayPreference::LocaleDefault,
            labels: RelativeDayLabels::default(),
        }
    }
}

impl FormatOptions {
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_preference(mut self, preference: DisplayPreference) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_labels(mut self, labels: RelativeDayLabels) -> Self {
        self.labels = labels;
        self
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_from_override() {
        assert_eq!(DisplayPreference::from_override(None), DisplayPreference::LocaleDefault);
        assert_eq!(
            DisplayPreference::from_override(Some(true)),
            DisplayPreference::TwentyFourHour
        );
        assert_eq!(
            DisplayPreference::from_override(Some(false)),
            DisplayPreference::TwelveHour
        );
    }

    #[test]
    fn test_settings_defaults() {
        let options = DisplaySettings::default().resolve().unwrap();
        assert_eq!(options, FormatOptions::default());
        assert_eq!(options.labels.tomorrow_short, "tmrw");
    }

    #[test]
    fn test_settings_from_json() {
        let settings = DisplaySettings::from_json(
            r#"{ "timezone": "Europe/Berlin", "locale": "de-DE", "use_24_hour": true }"#,
        )
        .unwrap();
        let options = settings.resolve().unwrap();
        assert_eq!(options.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(options.locale, Locale::de_DE);
        assert_eq!(options.preference, DisplayPreference::TwentyFourHour);
        assert_eq!(options.labels, RelativeDayLabels::default());
    }

    #[test]
    fn test_settings_partial_labels() {
        let settings =
            DisplaySettings::from_json(r#"{ "labels": { "today": "heute" } }"#).unwrap();
        assert_eq!(settings.labels.today, "heute");
        assert_eq!(settings.labels.yesterday, "yesterday");
        assert_eq!(settings.timezone, "UTC");
    }

    #[test]
    fn test_settings_round_trip_json() {
        let settings = DisplaySettings {
            use_24_hour: Some(false),
            ..DisplaySettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(DisplaySettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = DisplaySettings::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("Invalid settings"), "got: {err}");
    }

    #[test]
    fn test_invalid_timezone_returns_error() {
        let settings = DisplaySettings {
            timezone: "Invalid/Zone".to_string(),
            ..DisplaySettings::default()
        };
        let err = settings.resolve().unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_unknown_locale_degrades() {
        let settings = DisplaySettings {
            locale: "xx_XX".to_string(),
            ..DisplaySettings::default()
        };
        assert_eq!(settings.resolve().unwrap().locale, DEFAULT_LOCALE);
    }
}
