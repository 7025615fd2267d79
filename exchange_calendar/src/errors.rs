//! Calendar error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Fatal calendar-configuration errors.
///
/// Raised while building an [`ExchangeCalendar`](crate::ExchangeCalendar),
/// either from the built-in table or from a TOML config. Construction fails
/// as a whole; no partially-populated calendar is ever observable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A holiday datestring did not match `M/D/YYYY`.
    #[error("invalid holiday date {date:?}: expected M/D/YYYY")]
    InvalidHolidayDate {
        /// The offending datestring, as supplied.
        date: String,
    },

    /// A holiday kind string was not one of the two recognized values.
    #[error("unknown holiday kind {kind:?}: expected \"full day\" or \"early close\"")]
    UnknownHolidayKind {
        /// The offending kind string, as supplied.
        kind: String,
    },

    /// The same date appeared twice in the holiday table.
    #[error("duplicate holiday date {date}")]
    DuplicateHoliday {
        /// The duplicated date.
        date: NaiveDate,
    },

    /// The configured time zone is not a recognized IANA zone name.
    #[error("unknown timezone {name:?}")]
    UnknownTimezone {
        /// The offending zone name.
        name: String,
    },

    /// A session time did not parse as `HH:MM`.
    #[error("invalid time of day {time:?}: expected HH:MM")]
    InvalidTime {
        /// The offending time string.
        time: String,
    },

    /// The session times are not ordered `open < early_close <= normal_close`.
    #[error("session times out of order: open {open}, early close {early_close}, normal close {normal_close}")]
    InvalidSessionTimes {
        /// Session open.
        open: chrono::NaiveTime,
        /// Early (shortened-session) close.
        early_close: chrono::NaiveTime,
        /// Normal close.
        normal_close: chrono::NaiveTime,
    },

    /// A calendar config file could not be read.
    #[error("failed to read calendar config {path:?}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The calendar config was not valid TOML for the expected shape.
    #[error("failed to parse calendar config TOML")]
    Toml(#[from] toml::de::Error),
}
