//! Holiday records: date parsing and closure kinds.
//!
//! Holiday tables arrive as `("M/D/YYYY", kind)` string pairs - either from
//! the built-in US table or from a TOML config - and are validated strictly
//! here. Any malformed entry aborts calendar construction.

use chrono::NaiveDate;

use crate::errors::ConfigError;

/// Classification of an exchange holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayKind {
    /// The exchange does not trade at all on this date.
    FullDay,
    /// The exchange trades a shortened session ending at the early close.
    EarlyClose,
}

impl HolidayKind {
    /// Parse a holiday kind string (`"full day"` or `"early close"`).
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        match text.trim() {
            "full day" => Ok(HolidayKind::FullDay),
            "early close" => Ok(HolidayKind::EarlyClose),
            other => Err(ConfigError::UnknownHolidayKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// Parse a holiday datestring in `M/D/YYYY` form.
///
/// Month and day may be 1 or 2 digits (zero-padding optional); the year must
/// be exactly 4 digits. Leading and trailing whitespace is stripped. Anything
/// else - wrong component counts, non-digits, out-of-range dates - is a
/// [`ConfigError::InvalidHolidayDate`].
pub fn parse_holiday_date(text: &str) -> Result<NaiveDate, ConfigError> {
    let invalid = || ConfigError::InvalidHolidayDate {
        date: text.to_string(),
    };

    let trimmed = text.trim();
    let mut parts = trimmed.split('/');
    let (month, day, year) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(d), Some(y), None) => (m, d, y),
        _ => return Err(invalid()),
    };
    if !is_digits(month, 1, 2) || !is_digits(day, 1, 2) || !is_digits(year, 4, 4) {
        return Err(invalid());
    }

    // Components are pure ASCII digits at this point, so parsing can only
    // fail on out-of-range values, which from_ymd_opt rejects anyway.
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn is_digits(s: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded_dates() {
        let a = parse_holiday_date("1/1/2016").expect("parse");
        assert_eq!(a, NaiveDate::from_ymd_opt(2016, 1, 1).unwrap());

        let b = parse_holiday_date("11/25/2016").expect("parse");
        assert_eq!(b, NaiveDate::from_ymd_opt(2016, 11, 25).unwrap());

        let c = parse_holiday_date(" 07/04/2016 ").expect("parse");
        assert_eq!(c, NaiveDate::from_ymd_opt(2016, 7, 4).unwrap());
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad in ["1/1/16", "2016-01-01", "13/1/2016", "2/30/2016", "a/b/2016", "1/1/2016/9", ""] {
            let err = parse_holiday_date(bad).expect_err("must fail");
            assert!(matches!(err, ConfigError::InvalidHolidayDate { .. }), "input {bad:?}");
        }
    }

    #[test]
    fn parses_kinds() {
        assert_eq!(HolidayKind::parse("full day").unwrap(), HolidayKind::FullDay);
        assert_eq!(HolidayKind::parse("early close").unwrap(), HolidayKind::EarlyClose);
        assert!(matches!(
            HolidayKind::parse("half day"),
            Err(ConfigError::UnknownHolidayKind { .. })
        ));
    }
}
