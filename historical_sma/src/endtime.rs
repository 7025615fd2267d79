//! End-instant normalization.
//!
//! Callers describe the end of the requested window as "now", a naive
//! wall-clock time, or a zone-tagged instant. Window resolution needs that
//! instant in the exchange's frame; the upstream source needs it as a
//! machine-local string. Both conversions happen here, strictly:
//! - A future end instant is an error, never clamped.
//! - An instant tagged with any zone other than the machine-local zone or
//!   the calendar's exchange zone is an error.
//! - A naive time that is ambiguous or nonexistent in the machine-local
//!   zone (DST fall-back / spring-forward) is an error.
//!
//! The wire string carries no zone on purpose: the upstream source rejects
//! daylight-saving zone abbreviations outright, so the connecting machine's
//! local time is sent bare and the source attaches the zone itself.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use exchange_calendar::ExchangeCalendar;
use thiserror::Error;

/// Upstream format for the end-instant wire string (machine-local, no zone).
pub const END_WIRE_FORMAT: &str = "%Y%m%d %H:%M:%S";

/// The end of the requested window, as supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub enum EndTime {
    /// The current wall-clock instant.
    Now,
    /// A naive wall-clock time, interpreted as machine-local.
    Naive(NaiveDateTime),
    /// An instant in the machine's local zone.
    MachineLocal(DateTime<Local>),
    /// An instant in the exchange's zone (must match the calendar's).
    Exchange(DateTime<Tz>),
}

/// An end instant normalized for both consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEnd {
    /// The end instant in the exchange's frame, for window resolution.
    pub exchange: DateTime<Tz>,
    /// The machine-local wire string forwarded upstream.
    pub wire: String,
}

/// Rejected end instants.
#[derive(Debug, Error)]
pub enum EndTimeError {
    /// The end instant lies after the current clock.
    #[error("end instant {end} is in the future (now: {now})")]
    FutureEndTime {
        /// The rejected instant (UTC).
        end: DateTime<Utc>,
        /// The clock it was compared against (UTC).
        now: DateTime<Utc>,
    },

    /// The instant was tagged with a zone the calendar does not use.
    #[error("end instant zone {found} does not match the exchange zone {expected}")]
    ZoneMismatch {
        /// The calendar's zone.
        expected: Tz,
        /// The zone the caller supplied.
        found: Tz,
    },

    /// A naive time that occurs twice in the machine-local zone.
    #[error("end instant {0} is ambiguous in the machine-local zone (DST fall-back)")]
    AmbiguousLocalTime(NaiveDateTime),

    /// A naive time that never occurs in the machine-local zone.
    #[error("end instant {0} does not exist in the machine-local zone (DST spring-forward)")]
    NonexistentLocalTime(NaiveDateTime),
}

/// Normalize an end instant against the current wall clock.
pub fn resolve(end: EndTime, calendar: &ExchangeCalendar) -> Result<ResolvedEnd, EndTimeError> {
    resolve_at(end, calendar, Local::now())
}

/// Normalize an end instant against an explicit "now" (deterministic).
pub fn resolve_at(
    end: EndTime,
    calendar: &ExchangeCalendar,
    now: DateTime<Local>,
) -> Result<ResolvedEnd, EndTimeError> {
    use chrono::offset::LocalResult;

    let exchange_zone = calendar.timezone();
    let local: DateTime<Local> = match end {
        EndTime::Now => now,
        EndTime::Naive(naive) => match Local.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(_, _) => return Err(EndTimeError::AmbiguousLocalTime(naive)),
            LocalResult::None => return Err(EndTimeError::NonexistentLocalTime(naive)),
        },
        EndTime::MachineLocal(dt) => dt,
        EndTime::Exchange(dt) => {
            let found = dt.timezone();
            if found != exchange_zone {
                return Err(EndTimeError::ZoneMismatch {
                    expected: exchange_zone,
                    found,
                });
            }
            dt.with_timezone(&Local)
        }
    };

    if local > now {
        return Err(EndTimeError::FutureEndTime {
            end: local.with_timezone(&Utc),
            now: now.with_timezone(&Utc),
        });
    }

    Ok(ResolvedEnd {
        exchange: local.with_timezone(&exchange_zone),
        wire: local.format(END_WIRE_FORMAT).to_string(),
    })
}
