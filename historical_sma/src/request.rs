//! The request facade: everything the data-request collaborator needs.
//!
//! [`plan_request`] is the first of the two core boundary functions. It
//! sequences end-instant normalization, bar-size parsing, and window
//! resolution, and hands back a self-describing [`HistoricalRequest`]: the
//! resolved window for later aggregation plus the exact wire strings the
//! collaborator forwards upstream. The collaborator owns everything after
//! that - connection, request IDs, asynchronous delivery - and calls
//! [`aggregate`](crate::aggregate::aggregate) once with the finalized batch.

use std::num::NonZeroU32;

use chrono::{DateTime, Local};
use exchange_calendar::ExchangeCalendar;
use serde::Serialize;
use tracing::debug;

use crate::endtime::{self, EndTime};
use crate::errors::Error;
use crate::models::barsize::BarSize;
use crate::window::{self, RequestWindow};

/// A fully-planned historical request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalRequest {
    /// Resolved window: exact start and coarse duration.
    pub window: RequestWindow,
    /// Machine-local end-instant string, e.g. `"20161128 16:00:00"`.
    pub end_wire: String,
    /// Duration string, e.g. `"7 M"`.
    pub duration_wire: String,
    /// Bar-size string, e.g. `"1 secs"`.
    pub bar_size_wire: String,
}

/// Plan a request for `count` bars of `bar_size_text` ending at `end`,
/// against the current wall clock.
pub fn plan_request(
    count: NonZeroU32,
    bar_size_text: &str,
    end: EndTime,
    calendar: &ExchangeCalendar,
) -> Result<HistoricalRequest, Error> {
    plan_request_at(count, bar_size_text, end, calendar, Local::now())
}

/// Plan a request against an explicit "now" (deterministic).
pub fn plan_request_at(
    count: NonZeroU32,
    bar_size_text: &str,
    end: EndTime,
    calendar: &ExchangeCalendar,
    now: DateTime<Local>,
) -> Result<HistoricalRequest, Error> {
    let bar_size: BarSize = bar_size_text.parse()?;
    let resolved_end = endtime::resolve_at(end, calendar, now)?;
    let window = window::resolve(count, bar_size, resolved_end.exchange, calendar)?;

    let request = HistoricalRequest {
        end_wire: resolved_end.wire,
        duration_wire: window.duration.to_string(),
        bar_size_wire: bar_size.wire_form(),
        window,
    };
    debug!(
        end = %request.end_wire,
        duration = %request.duration_wire,
        bar_size = %request.bar_size_wire,
        "planned historical request"
    );
    Ok(request)
}
