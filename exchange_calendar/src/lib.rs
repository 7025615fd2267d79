//! Trading-exchange calendar primitives.
//!
//! What this crate provides:
//! - [`ExchangeCalendar`]: an immutable description of one exchange's trading
//!   schedule (time zone, session times, holiday table) plus the predicates
//!   and backward walks built on it: trading-day checks, trading-hours
//!   checks, previous-trading-day stepping, and off-hours snapping to the
//!   most recent session close.
//! - [`HolidayKind`]: full-day closures vs. shortened (early-close) sessions.
//! - [`config`]: a TOML-backed calendar configuration format so alternate
//!   exchange fixtures can be loaded at startup.
//!
//! Notes:
//! - Everything here is deterministic, pure logic. No IO (beyond optional
//!   config file loading), no wall clock, no mutation after construction.
//! - A constructed calendar is `Send + Sync` and may be shared by reference
//!   across threads without synchronization.
//! - All backward walks are bounded by [`MAX_LOOKBACK_DAYS`]; exhaustion is
//!   reported with `None` rather than walking forever on a pathological
//!   holiday table.

#![deny(missing_docs)]

pub mod calendar;
pub mod config;
pub mod errors;
pub mod holiday;

pub use calendar::{ExchangeCalendar, MAX_LOOKBACK_DAYS};
pub use config::{load_calendar_path, load_calendar_str};
pub use errors::ConfigError;
pub use holiday::HolidayKind;
