//! Bar-size parsing: `"<1-99> <sec|secs|min|mins|hour|hours|day>"`.
//!
//! The unit is normalized internally - singular iff the magnitude is 1,
//! plural otherwise, regardless of how the caller spelled it. The wire form
//! sent upstream matches the normalized form with one documented exception:
//! a magnitude-1 second granularity must be sent as `"1 secs"`, because the
//! upstream source rejects `"1 sec"` despite its own documentation.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Bar-size granularity unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarUnit {
    /// One-second buckets.
    Second,
    /// One-minute buckets.
    Minute,
    /// One-hour buckets.
    Hour,
    /// One-trading-day buckets.
    Day,
}

impl BarUnit {
    /// Seconds per unit for intraday granularities.
    ///
    /// `Day` has no fixed second span - a trading day's length depends on
    /// the calendar - so the resolver branches on unit before using this.
    pub const fn intraday_secs(self) -> Option<i64> {
        match self {
            BarUnit::Second => Some(1),
            BarUnit::Minute => Some(60),
            BarUnit::Hour => Some(3_600),
            BarUnit::Day => None,
        }
    }

    const fn singular(self) -> &'static str {
        match self {
            BarUnit::Second => "sec",
            BarUnit::Minute => "min",
            BarUnit::Hour => "hour",
            BarUnit::Day => "day",
        }
    }

    const fn plural(self) -> &'static str {
        match self {
            BarUnit::Second => "secs",
            BarUnit::Minute => "mins",
            BarUnit::Hour => "hours",
            BarUnit::Day => "days",
        }
    }
}

/// A bar size = magnitude × unit (e.g., 5-Minute, 1-Day).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSize {
    magnitude: u32,
    unit: BarUnit,
}

impl BarSize {
    /// Create a bar size; the magnitude must be 1–99.
    pub fn new(magnitude: u32, unit: BarUnit) -> Result<Self, BarSizeError> {
        if !(1..=99).contains(&magnitude) {
            return Err(BarSizeError::InvalidMagnitude { magnitude });
        }
        Ok(Self { magnitude, unit })
    }

    /// Magnitude component.
    pub const fn magnitude(self) -> u32 {
        self.magnitude
    }

    /// Unit component.
    pub const fn unit(self) -> BarUnit {
        self.unit
    }

    /// The string sent to the data source.
    ///
    /// Identical to [`Display`](fmt::Display) except for the `"1 secs"`
    /// quirk preserved verbatim.
    pub fn wire_form(self) -> String {
        match (self.magnitude, self.unit) {
            (1, BarUnit::Second) => "1 secs".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Normalized form: singular unit iff magnitude is 1.
impl fmt::Display for BarSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = if self.magnitude == 1 {
            self.unit.singular()
        } else {
            self.unit.plural()
        };
        write!(f, "{} {unit}", self.magnitude)
    }
}

impl FromStr for BarSize {
    type Err = BarSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BarSizeError::InvalidInput {
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let (digits, unit) = trimmed.split_once(' ').ok_or_else(invalid)?;
        if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let magnitude: u32 = digits.parse().map_err(|_| invalid())?;
        let unit = match unit {
            "sec" | "secs" => BarUnit::Second,
            "min" | "mins" => BarUnit::Minute,
            "hour" | "hours" => BarUnit::Hour,
            "day" => BarUnit::Day,
            _ => return Err(invalid()),
        };
        Self::new(magnitude, unit)
    }
}

/// Bar-size text that does not describe a usable granularity.
#[derive(Debug, Error)]
pub enum BarSizeError {
    /// The text did not match `"<1-2 digits> <unit>"`.
    #[error("invalid bar size {input:?}: expected \"<1-99> <sec|secs|min|mins|hour|hours|day>\"")]
    InvalidInput {
        /// The offending input, as supplied.
        input: String,
    },

    /// The magnitude was outside 1–99.
    #[error("bar size magnitude must be 1-99, got {magnitude}")]
    InvalidMagnitude {
        /// The rejected magnitude.
        magnitude: u32,
    },
}
