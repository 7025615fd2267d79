//! The exchange calendar: session times, holiday table, and the predicates
//! and backward walks built on them.
//!
//! All methods take `&self` and touch no external state. Instants handed to
//! hour-level predicates are expected to already be in the calendar's own
//! time zone (`DateTime<Tz>` with this calendar's `Tz`); frame conversion is
//! the caller's job and is kept explicit at the API edges.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;
use indexmap::IndexMap;
use tracing::info;

use crate::errors::ConfigError;
use crate::holiday::{self, HolidayKind};

/// Upper bound, in calendar days, on any backward walk.
///
/// Roughly ten years - double the five-year history ceiling of the upstream
/// data source, so the bound can never bite on a request the source could
/// actually serve. Walks that exhaust it return `None` instead of looping.
pub const MAX_LOOKBACK_DAYS: u32 = 3_660;

// Spring-forward gaps in IANA data are at most two hours wide.
const DST_GAP_SHIFT_LIMIT_MINUTES: i64 = 120;

/// One exchange's trading schedule: time zone, session times, holidays.
///
/// Immutable after construction. Weekends are never trading days regardless
/// of the holiday table; an early-close holiday is a trading day with a
/// shortened session.
#[derive(Debug, Clone)]
pub struct ExchangeCalendar {
    timezone: Tz,
    open: NaiveTime,
    normal_close: NaiveTime,
    early_close: NaiveTime,
    holidays: IndexMap<NaiveDate, HolidayKind>,
}

impl ExchangeCalendar {
    /// Build a calendar from already-parsed parts.
    ///
    /// Errors on duplicate holiday dates and on session times that are not
    /// ordered `open < early_close <= normal_close`.
    pub fn new(
        timezone: Tz,
        open: NaiveTime,
        normal_close: NaiveTime,
        early_close: NaiveTime,
        holidays: impl IntoIterator<Item = (NaiveDate, HolidayKind)>,
    ) -> Result<Self, ConfigError> {
        if open >= early_close || early_close > normal_close {
            return Err(ConfigError::InvalidSessionTimes {
                open,
                early_close,
                normal_close,
            });
        }

        let mut table = IndexMap::new();
        for (date, kind) in holidays {
            if table.insert(date, kind).is_some() {
                return Err(ConfigError::DuplicateHoliday { date });
            }
        }

        info!(
            timezone = %timezone,
            holidays = table.len(),
            "constructed exchange calendar"
        );
        Ok(Self {
            timezone,
            open,
            normal_close,
            early_close,
            holidays: table,
        })
    }

    /// Build a calendar from `("M/D/YYYY", kind)` string pairs.
    ///
    /// This is the shape holiday tables are maintained in; every entry is
    /// validated strictly and any malformed entry fails the whole build.
    pub fn from_datestrings(
        timezone: Tz,
        open: NaiveTime,
        normal_close: NaiveTime,
        early_close: NaiveTime,
        entries: &[(&str, &str)],
    ) -> Result<Self, ConfigError> {
        let mut holidays = Vec::with_capacity(entries.len());
        for (date, kind) in entries {
            holidays.push((holiday::parse_holiday_date(date)?, HolidayKind::parse(kind)?));
        }
        Self::new(timezone, open, normal_close, early_close, holidays)
    }

    /// The built-in US-exchange configuration: `America/New_York`, 09:30
    /// open, 16:00 normal close, 13:00 early close, holidays 2010–2016.
    ///
    /// The table reaches back to 2010 because the upstream source serves up
    /// to five years of history.
    pub fn us_equities() -> Self {
        Self::from_datestrings(
            chrono_tz::America::New_York,
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            US_TRADING_HOLIDAYS,
        )
        .expect("built-in holiday table is valid")
    }

    /// The calendar's time zone.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Session open time.
    pub fn open_time(&self) -> NaiveTime {
        self.open
    }

    /// Number of holiday records in the table.
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }

    /// Holiday classification for `date`, if any.
    pub fn holiday_kind(&self, date: NaiveDate) -> Option<HolidayKind> {
        self.holidays.get(&date).copied()
    }

    /// True if the exchange trades at all on `date`.
    ///
    /// Saturdays and Sundays are never trading days, holiday table or not.
    /// Early-close days count as trading days.
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        self.holiday_kind(date) != Some(HolidayKind::FullDay)
    }

    /// Close time on `date`: the early close on early-close days, the normal
    /// close otherwise.
    pub fn close_time_on(&self, date: NaiveDate) -> NaiveTime {
        if self.holiday_kind(date) == Some(HolidayKind::EarlyClose) {
            self.early_close
        } else {
            self.normal_close
        }
    }

    /// Open-to-close span of `date`'s session, in seconds.
    pub fn session_secs(&self, date: NaiveDate) -> i64 {
        (self.close_time_on(date) - self.open).num_seconds()
    }

    /// True if `instant` falls within trading hours: its date trades and its
    /// time of day lies in `[open, close]` (close inclusive, shortened on
    /// early-close days).
    pub fn is_within_trading_hours(&self, instant: DateTime<Tz>) -> bool {
        let date = instant.date_naive();
        if !self.is_trading_day(date) {
            return false;
        }
        let time = instant.time();
        self.open <= time && time <= self.close_time_on(date)
    }

    /// The nearest trading day strictly before `date`.
    ///
    /// Strictly decreasing; the result always satisfies
    /// [`is_trading_day`](Self::is_trading_day). Returns `None` once
    /// [`MAX_LOOKBACK_DAYS`] calendar days have been stepped without finding
    /// one.
    pub fn previous_trading_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut day = date;
        for _ in 0..MAX_LOOKBACK_DAYS {
            day = day.pred_opt()?;
            if self.is_trading_day(day) {
                return Some(day);
            }
        }
        None
    }

    /// Snap an instant onto the trading timeline: the most recent session
    /// close at or before it.
    ///
    /// If `instant`'s date trades and the instant is after that day's close,
    /// that same close is returned; otherwise the close of the previous
    /// trading day. An instant before the open on a trading day therefore
    /// snaps to the prior day's close.
    pub fn most_recent_close_before(&self, instant: DateTime<Tz>) -> Option<DateTime<Tz>> {
        let date = instant.date_naive();
        if self.is_trading_day(date) {
            let close = self.close_time_on(date);
            if instant.time() > close {
                return Some(self.localize(date.and_time(close)));
            }
        }
        let prev = self.previous_trading_day(date)?;
        Some(self.localize(prev.and_time(self.close_time_on(prev))))
    }

    /// Attach the exchange zone to a wall-clock time.
    ///
    /// Total and deterministic across DST transitions: a fall-back overlap
    /// resolves to the earliest instant, and a spring-forward gap shifts
    /// forward minute by minute to the first valid wall time. Exchange
    /// session times never sit inside the 2 a.m. transition window, so the
    /// policy only becomes observable with fixture calendars.
    pub fn localize(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        use chrono::offset::LocalResult::*;
        match self.timezone.from_local_datetime(&naive) {
            Single(dt) => dt,
            Ambiguous(earliest, _) => earliest,
            None => {
                let mut shifted = naive;
                for _ in 0..DST_GAP_SHIFT_LIMIT_MINUTES {
                    shifted += Duration::minutes(1);
                    if let Single(dt) = self.timezone.from_local_datetime(&shifted) {
                        return dt;
                    }
                }
                self.timezone.from_utc_datetime(&naive)
            }
        }
    }
}

/// US exchange holidays, 2010–2016.
///
/// Recorded back to 2010 because up to 5 years of history can be requested.
const US_TRADING_HOLIDAYS: &[(&str, &str)] = &[
    ("1/1/2010", "full day"),
    ("1/18/2010", "full day"),
    ("2/15/2010", "full day"),
    ("4/4/2010", "full day"),
    ("5/31/2010", "full day"),
    ("7/5/2010", "full day"),
    ("9/6/2010", "full day"),
    ("11/25/2010", "full day"),
    ("11/26/2010", "early close"),
    ("12/24/2010", "full day"),
    ("1/17/2011", "full day"),
    ("2/21/2011", "full day"),
    ("4/22/2011", "full day"),
    ("5/30/2011", "full day"),
    ("7/4/2011", "full day"),
    ("9/5/2011", "full day"),
    ("11/24/2011", "full day"),
    ("11/25/2011", "early close"),
    ("12/26/2011", "full day"),
    ("1/2/2012", "full day"),
    ("1/16/2012", "full day"),
    ("2/20/2012", "full day"),
    ("4/6/2012", "full day"),
    ("5/28/2012", "full day"),
    ("7/3/2012", "early close"),
    ("7/4/2012", "full day"),
    ("9/3/2012", "full day"),
    ("11/22/2012", "full day"),
    ("11/23/2012", "early close"),
    ("12/24/2012", "early close"),
    ("12/25/2012", "full day"),
    ("1/1/2013", "full day"),
    ("1/21/2013", "full day"),
    ("2/18/2013", "full day"),
    ("3/29/2013", "full day"),
    ("5/27/2013", "full day"),
    ("7/3/2013", "early close"),
    ("7/4/2013", "full day"),
    ("9/2/2013", "full day"),
    ("11/28/2013", "full day"),
    ("11/29/2013", "early close"),
    ("12/24/2013", "early close"),
    ("12/25/2013", "full day"),
    ("1/1/2014", "full day"),
    ("1/20/2014", "full day"),
    ("2/17/2014", "full day"),
    ("4/18/2014", "full day"),
    ("5/26/2014", "full day"),
    ("7/3/2014", "early close"),
    ("7/4/2014", "full day"),
    ("9/1/2014", "full day"),
    ("11/27/2014", "full day"),
    ("11/28/2014", "early close"),
    ("12/24/2014", "early close"),
    ("12/25/2014", "full day"),
    ("1/1/2015", "full day"),
    ("1/19/2015", "full day"),
    ("2/16/2015", "full day"),
    ("4/3/2015", "full day"),
    ("5/25/2015", "full day"),
    ("7/3/2015", "full day"),
    ("9/7/2015", "full day"),
    ("11/26/2015", "full day"),
    ("11/27/2015", "early close"),
    ("12/24/2015", "early close"),
    ("12/25/2015", "full day"),
    ("1/1/2016", "full day"),
    ("1/18/2016", "full day"),
    ("2/15/2016", "full day"),
    ("3/25/2016", "full day"),
    ("5/30/2016", "full day"),
    ("7/3/2016", "early close"),
    ("7/4/2016", "full day"),
    ("9/5/2016", "full day"),
    ("11/25/2016", "early close"),
    ("12/26/2016", "full day"),
];
