//! Coarse duration descriptors for bulk historical requests.
//!
//! The upstream data source will not accept an arbitrary `(start, end)` pair;
//! it wants one coarse "how far back" figure, and it rejects raw day counts
//! beyond a threshold, so multi-day spans must be expressed in weeks, months
//! or years. [`DurationDescriptor::from_span`] encodes the empirically-tuned
//! precedence table that maps a broken-down calendar span to the coarsest
//! unit that still covers it. Every branch rounds up, so the request always
//! yields at least as many bars as asked for.
//!
//! The thresholds 11 (months), 27 (days), 23 (hours) and the 6-day week
//! cutoff are calibration constants for the source's request-size limits.
//! They are not a general rounding rule and must not be "fixed".

use std::fmt;

use chrono::{Datelike, Months, NaiveDateTime};
use serde::Serialize;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Duration unit accepted by the upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DurationUnit {
    /// Seconds (`S`).
    Second,
    /// Calendar days (`D`).
    Day,
    /// Weeks (`W`).
    Week,
    /// Calendar months (`M`).
    Month,
    /// Calendar years (`Y`).
    Year,
}

impl DurationUnit {
    const fn letter(self) -> char {
        match self {
            DurationUnit::Second => 'S',
            DurationUnit::Day => 'D',
            DurationUnit::Week => 'W',
            DurationUnit::Month => 'M',
            DurationUnit::Year => 'Y',
        }
    }
}

/// How far back a bulk historical request reaches: magnitude × unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationDescriptor {
    /// Magnitude component.
    pub magnitude: u32,
    /// Unit component.
    pub unit: DurationUnit,
}

/// Wire form: `"<integer> <unit-letter>"`, e.g. `"7 M"`.
impl fmt::Display for DurationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit.letter())
    }
}

impl DurationDescriptor {
    /// Apply the precedence table, top to bottom, first match wins.
    pub fn from_span(span: Span) -> Self {
        let (magnitude, unit) = if span.years > 0 {
            (span.years + 1, DurationUnit::Year)
        } else if span.months == 11 {
            (1, DurationUnit::Year)
        } else if span.months > 0 {
            (span.months + 1, DurationUnit::Month)
        } else if span.days == 27 {
            (1, DurationUnit::Month)
        } else if span.days >= 6 {
            (span.days / 7 + 1, DurationUnit::Week)
        } else if span.days > 0 {
            (span.days + 1, DurationUnit::Day)
        } else if span.hours == 23 {
            (1, DurationUnit::Day)
        } else {
            (
                span.hours * 3_600 + span.minutes * 60 + span.seconds,
                DurationUnit::Second,
            )
        };
        Self { magnitude, unit }
    }

    /// Descriptor covering the wall-clock span from `start` to `end`.
    pub fn covering(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::from_span(Span::between(start, end))
    }
}

/// Broken-down absolute calendar difference between two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Whole years.
    pub years: u32,
    /// Whole months beyond the years, 0–11.
    pub months: u32,
    /// Whole days beyond the months.
    pub days: u32,
    /// Whole hours beyond the days, 0–23.
    pub hours: u32,
    /// Whole minutes beyond the hours, 0–59.
    pub minutes: u32,
    /// Whole seconds beyond the minutes, 0–59.
    pub seconds: u32,
}

impl Span {
    /// Break `end - start` into calendar components, `start <= end`.
    ///
    /// The month count anchors on `end`: it is the largest whole number of
    /// (day-clamped) calendar months that can be stepped back from `end`
    /// without passing `start`; the remainder is the exact second delta from
    /// `start` to that anchor, split into days/hours/minutes/seconds. This
    /// matches how the duration table was calibrated, clamping included
    /// (e.g. one month back from March 31 is the last day of February).
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        debug_assert!(start <= end, "span requires start <= end");

        let mut offset =
            (start.year() - end.year()) * 12 + start.month() as i32 - end.month() as i32;
        let mut anchor = shift_months(end, offset);
        while anchor < start {
            offset += 1;
            anchor = shift_months(end, offset);
        }

        let months_total = (-offset).max(0) as u32;
        let rem = (anchor - start).num_seconds().max(0);
        Span {
            years: months_total / 12,
            months: months_total % 12,
            days: (rem / SECS_PER_DAY) as u32,
            hours: (rem % SECS_PER_DAY / SECS_PER_HOUR) as u32,
            minutes: (rem % SECS_PER_HOUR / SECS_PER_MINUTE) as u32,
            seconds: (rem % SECS_PER_MINUTE) as u32,
        }
    }
}

fn shift_months(dt: NaiveDateTime, months: i32) -> NaiveDateTime {
    // Only unrepresentable at the edges of chrono's ±262k-year range.
    if months >= 0 {
        dt.checked_add_months(Months::new(months as u32))
    } else {
        dt.checked_sub_months(Months::new(months.unsigned_abs()))
    }
    .expect("month shift within datetime range")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn span_splits_months_and_remainder() {
        let span = Span::between(dt(2016, 1, 30, 0, 0, 0), dt(2016, 2, 28, 23, 0, 0));
        assert_eq!(
            span,
            Span { days: 29, hours: 23, ..Span::default() }
        );

        let span = Span::between(dt(2016, 2, 29, 0, 0, 0), dt(2016, 3, 29, 0, 0, 0));
        assert_eq!(span, Span { months: 1, ..Span::default() });

        let span = Span::between(dt(2016, 1, 2, 0, 0, 0), dt(2016, 12, 30, 0, 0, 0));
        assert_eq!(span, Span { months: 11, days: 28, ..Span::default() });

        let span = Span::between(dt(2015, 6, 1, 9, 30, 0), dt(2016, 11, 28, 16, 0, 0));
        assert_eq!(
            span,
            Span { years: 1, months: 5, days: 27, hours: 6, minutes: 30, ..Span::default() }
        );
    }

    #[test]
    fn span_of_equal_instants_is_zero() {
        let t = dt(2016, 11, 28, 16, 0, 0);
        assert_eq!(Span::between(t, t), Span::default());
    }

    #[test]
    fn table_precedence_first_match_wins() {
        let d = |span| DurationDescriptor::from_span(span).to_string();

        assert_eq!(d(Span { years: 1, months: 5, ..Span::default() }), "2 Y");
        assert_eq!(d(Span { months: 11, days: 28, ..Span::default() }), "1 Y");
        assert_eq!(d(Span { months: 6, days: 27, ..Span::default() }), "7 M");
        assert_eq!(d(Span { days: 27, hours: 12, ..Span::default() }), "1 M");
        assert_eq!(d(Span { days: 26, ..Span::default() }), "4 W");
        assert_eq!(d(Span { days: 7, ..Span::default() }), "2 W");
        assert_eq!(d(Span { days: 6, ..Span::default() }), "1 W");
        assert_eq!(d(Span { days: 5, hours: 23, ..Span::default() }), "6 D");
        assert_eq!(d(Span { days: 1, ..Span::default() }), "2 D");
        assert_eq!(d(Span { hours: 23, minutes: 59, ..Span::default() }), "1 D");
        assert_eq!(
            d(Span { hours: 6, minutes: 30, seconds: 2, ..Span::default() }),
            "23402 S"
        );
    }

    #[test]
    fn descriptor_magnitude_never_under_reports() {
        // Each branch rounds up: re-deriving the descriptor from a span equal
        // to the descriptor's own coarse size stays at or above it.
        let span = Span { days: 10, hours: 4, ..Span::default() };
        let desc = DurationDescriptor::from_span(span);
        assert_eq!(desc.to_string(), "2 W");
        assert!(desc.magnitude as i64 * 7 * 24 * 3_600 >= 10 * 24 * 3_600 + 4 * 3_600);
    }
}
