//! Canonical in-memory representation of a delivered historical bar (OHLC).
//!
//! Bars arrive from the external data-request collaborator as an unordered
//! batch; this crate only reads them. Timestamps are always full instants -
//! day-granularity wire stamps parse to midnight UTC - so there is no
//! date-vs-datetime branching anywhere downstream.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::barsize::BarUnit;

/// A single historical price bar for a given timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// The timestamp for this bar (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,
}

impl Bar {
    /// Read the value an aggregation over `field` uses from this bar.
    pub fn field(&self, field: BarField) -> f64 {
        match field {
            BarField::Open => self.open,
            BarField::High => self.high,
            BarField::Low => self.low,
            BarField::Close => self.close,
            BarField::Avg => (self.high + self.low) / 2.0,
        }
    }

    /// Parse an upstream wire timestamp.
    ///
    /// Day bars arrive as `"%Y%m%d"`; intraday bars as `"%Y%m%d  %H:%M:%S"`
    /// (two spaces between date and time - the source's format, preserved
    /// verbatim).
    pub fn parse_wire_timestamp(text: &str, unit: BarUnit) -> Result<DateTime<Utc>, BarTimestampError> {
        let invalid = || BarTimestampError(text.to_string());
        let naive = match unit {
            BarUnit::Day => NaiveDate::parse_from_str(text, "%Y%m%d")
                .map_err(|_| invalid())?
                .and_hms_opt(0, 0, 0)
                .ok_or_else(invalid)?,
            _ => NaiveDateTime::parse_from_str(text, "%Y%m%d  %H:%M:%S").map_err(|_| invalid())?,
        };
        Ok(naive.and_utc())
    }
}

/// The OHLC field an aggregation reads from each bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarField {
    /// Opening price.
    Open,
    /// High price.
    High,
    /// Low price.
    Low,
    /// Closing price.
    Close,
    /// High/low midpoint, `(high + low) / 2`.
    Avg,
}

/// The requested OHLC field is not one of the five recognized keys.
#[derive(Debug, Error)]
#[error("unknown OHLC field {0:?}: expected open, high, low, close or avg")]
pub struct UnknownFieldError(pub String);

impl FromStr for BarField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(BarField::Open),
            "high" => Ok(BarField::High),
            "low" => Ok(BarField::Low),
            "close" => Ok(BarField::Close),
            "avg" => Ok(BarField::Avg),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

/// A wire timestamp did not match the expected upstream format.
#[derive(Debug, Error)]
#[error("invalid bar timestamp {0:?}")]
pub struct BarTimestampError(pub String);
