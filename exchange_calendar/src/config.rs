//! Calendar configuration: TOML parsing and strict validation.
//!
//! A calendar config describes one exchange:
//! - `timezone` - IANA zone name (e.g., "America/New_York")
//! - `open`, `normal_close`, `early_close` - wall-clock `HH:MM` times
//! - `[[holidays]]` - `{ date = "M/D/YYYY", kind = "full day" | "early close" }`
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`load_calendar_str`]
//! - Parse + validate from a file path: [`load_calendar_path`]
//!
//! Validation is all-or-nothing: any malformed entry aborts loading with a
//! [`ConfigError`] and no calendar is produced.

use std::path::Path;

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::calendar::ExchangeCalendar;
use crate::errors::ConfigError;
use crate::holiday::{self, HolidayKind};

/// Top-level calendar config shape.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    /// IANA time zone name.
    pub timezone: String,
    /// Session open, `HH:MM`.
    pub open: String,
    /// Normal session close, `HH:MM`.
    pub normal_close: String,
    /// Shortened-session close, `HH:MM`.
    pub early_close: String,
    /// Holiday records; may be empty.
    #[serde(default)]
    pub holidays: Vec<HolidayEntry>,
}

/// One holiday record in the config.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HolidayEntry {
    /// Datestring in `M/D/YYYY` form.
    pub date: String,
    /// `"full day"` or `"early close"`.
    pub kind: String,
}

/// Parse and validate a calendar from a TOML string.
pub fn load_calendar_str(toml_str: &str) -> Result<ExchangeCalendar, ConfigError> {
    let cfg: CalendarConfig = toml::from_str(toml_str)?;
    build(cfg)
}

/// Parse and validate a calendar from a TOML file.
pub fn load_calendar_path(path: impl AsRef<Path>) -> Result<ExchangeCalendar, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_calendar_str(&raw)
}

fn build(cfg: CalendarConfig) -> Result<ExchangeCalendar, ConfigError> {
    let timezone: Tz = cfg.timezone.parse().map_err(|_| ConfigError::UnknownTimezone {
        name: cfg.timezone.clone(),
    })?;
    let open = parse_time(&cfg.open)?;
    let normal_close = parse_time(&cfg.normal_close)?;
    let early_close = parse_time(&cfg.early_close)?;

    let mut holidays = Vec::with_capacity(cfg.holidays.len());
    for entry in &cfg.holidays {
        holidays.push((
            holiday::parse_holiday_date(&entry.date)?,
            HolidayKind::parse(&entry.kind)?,
        ));
    }
    ExchangeCalendar::new(timezone, open, normal_close, early_close, holidays)
}

fn parse_time(text: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").map_err(|_| ConfigError::InvalidTime {
        time: text.to_string(),
    })
}
