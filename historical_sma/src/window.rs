//! Window resolution: from "N bars ending here" to a concrete request window.
//!
//! Asking a data source for 150 daily bars is not a 150-day request: weekends
//! and holidays contribute nothing, so the window must reach further back in
//! calendar time than in trading time. The resolver walks backward from the
//! end instant counting only trading time - whole trading days for day bars,
//! trading seconds (early-close aware, weekends and holidays contributing
//! zero) for intraday bars - then expresses the resulting calendar span as a
//! coarse [`DurationDescriptor`] the source will accept.

use std::num::NonZeroU32;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use exchange_calendar::{ExchangeCalendar, MAX_LOOKBACK_DAYS};
use thiserror::Error;
use tracing::debug;

use crate::models::barsize::BarSize;
use crate::models::duration::DurationDescriptor;

// The span calculation truncates sub-second remainders, and the source often
// omits the newest second of 1-second data; backing the start off by two
// seconds covers both.
const START_BACKOFF_SECS: i64 = 2;

/// A resolved request window: exact start plus the coarse duration to ask for.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RequestWindow {
    /// Start of the window, exchange-local, always at or before the end.
    pub start: DateTime<Tz>,
    /// Coarse duration descriptor covering `[start, end]`.
    pub duration: DurationDescriptor,
}

/// Window resolution failures.
#[derive(Debug, Error)]
pub enum WindowError {
    /// The backward walk ran out of lookback before finding enough trading
    /// time; the calendar has no usable history that deep.
    #[error("no trading time within {limit} calendar days walking back from {from}")]
    LookbackExhausted {
        /// The date the walk started from.
        from: NaiveDate,
        /// The lookback bound that was exhausted.
        limit: u32,
    },
}

/// Resolve the window for `count` bars of `bar_size` ending at `end`.
///
/// `end` must already be in the calendar's own frame (see
/// [`endtime`](crate::endtime)). The returned start is the computed trading
/// start backed off by two seconds; the descriptor covers the span from that
/// start to `end` and never under-reports it.
pub fn resolve(
    count: NonZeroU32,
    bar_size: BarSize,
    end: DateTime<Tz>,
    calendar: &ExchangeCalendar,
) -> Result<RequestWindow, WindowError> {
    let raw_start = match bar_size.unit().intraday_secs() {
        None => {
            let date = trading_days_back(count, end.date_naive(), calendar)?;
            calendar.localize(date.and_time(NaiveTime::MIN))
        }
        Some(unit_secs) => {
            let budget = i64::from(count.get()) * i64::from(bar_size.magnitude()) * unit_secs;
            subtract_trading_secs(end, budget, calendar)?
        }
    };

    let start = raw_start - Duration::seconds(START_BACKOFF_SECS);
    let duration = DurationDescriptor::covering(start.naive_local(), end.naive_local());
    debug!(%start, %end, %duration, "resolved historical window");
    Ok(RequestWindow { start, duration })
}

/// The date `count` trading days before `end_date` (exclusive of it).
///
/// Steps backward one trading day at a time; weekends and full-day holidays
/// do not count. Exposed because the landing date - exchange-local midnight
/// of which anchors a day-bar window - is a useful property to check on its
/// own.
pub fn trading_days_back(
    count: NonZeroU32,
    end_date: NaiveDate,
    calendar: &ExchangeCalendar,
) -> Result<NaiveDate, WindowError> {
    let exhausted = || WindowError::LookbackExhausted {
        from: end_date,
        limit: MAX_LOOKBACK_DAYS,
    };
    let floor = end_date - Duration::days(i64::from(MAX_LOOKBACK_DAYS));

    let mut day = end_date;
    for _ in 0..count.get() {
        day = calendar.previous_trading_day(day).ok_or_else(exhausted)?;
        if day < floor {
            return Err(exhausted());
        }
    }
    Ok(day)
}

/// Subtract `budget` trading seconds from `end`.
///
/// An off-hours end first snaps to the most recent session close. If the
/// budget fits inside the current session (seconds since that day's open),
/// it is subtracted directly; otherwise whole previous sessions are consumed
/// - shortened ones on early-close days, none at all on weekends and
/// holidays - until the remainder lands inside one, at `close - remainder`.
fn subtract_trading_secs(
    end: DateTime<Tz>,
    budget: i64,
    calendar: &ExchangeCalendar,
) -> Result<DateTime<Tz>, WindowError> {
    let exhausted = || WindowError::LookbackExhausted {
        from: end.date_naive(),
        limit: MAX_LOOKBACK_DAYS,
    };
    let floor = end.date_naive() - Duration::days(i64::from(MAX_LOOKBACK_DAYS));

    let anchor = if calendar.is_within_trading_hours(end) {
        end
    } else {
        calendar.most_recent_close_before(end).ok_or_else(exhausted)?
    };

    let session_open = calendar.localize(anchor.date_naive().and_time(calendar.open_time()));
    let since_open = (anchor - session_open).num_seconds();
    if budget <= since_open {
        return Ok(anchor - Duration::seconds(budget));
    }

    let mut consumed = since_open;
    let mut day = calendar
        .previous_trading_day(anchor.date_naive())
        .ok_or_else(exhausted)?;
    loop {
        if day < floor {
            return Err(exhausted());
        }
        let session = calendar.session_secs(day);
        if consumed + session < budget {
            consumed += session;
            day = calendar.previous_trading_day(day).ok_or_else(exhausted)?;
        } else {
            let remainder = budget - consumed;
            let close = day.and_time(calendar.close_time_on(day));
            return Ok(calendar.localize(close - Duration::seconds(remainder)));
        }
    }
}
