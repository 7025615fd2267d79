//! Bar aggregation: the SMA over the newest `count` bars of a batch.
//!
//! The batch arrives unordered and possibly over-delivered (the duration
//! descriptor deliberately over-requests); aggregation sorts newest-first,
//! keeps exactly `count` bars, and refuses to produce a value from fewer -
//! a short batch is an error carrying everything that was delivered, so the
//! caller can see precisely what the source sent.

use std::fmt;
use std::num::NonZeroU32;

use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

use crate::models::bar::{Bar, BarField};

/// The source delivered fewer bars than the aggregation needs.
///
/// Carries the requested count, the window bounds, and the full list of bars
/// actually available, newest first, for diagnosis.
#[derive(Debug, Error)]
pub struct InsufficientDataError {
    /// How many bars the aggregation needed.
    pub requested: u32,
    /// Window start the request was resolved to.
    pub start: DateTime<Tz>,
    /// Window end the request was resolved to.
    pub end: DateTime<Tz>,
    /// Every bar that was delivered, newest first.
    pub bars: Vec<Bar>,
}

impl fmt::Display for InsufficientDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {} bars between {} and {} but the source delivered {}",
            self.requested,
            self.start,
            self.end,
            self.bars.len()
        )?;
        for bar in &self.bars {
            write!(f, "\n  {} close={}", bar.timestamp, bar.close)?;
        }
        Ok(())
    }
}

/// Mean of `field` over the newest `count` bars.
///
/// `start` and `end` are the resolved window bounds; they take no part in
/// the arithmetic and exist purely for the insufficiency diagnostic.
pub fn aggregate(
    count: NonZeroU32,
    bars: &[Bar],
    field: BarField,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
) -> Result<f64, InsufficientDataError> {
    let mut newest_first = bars.to_vec();
    newest_first.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    newest_first.truncate(count.get() as usize);

    if (newest_first.len() as u32) < count.get() {
        return Err(InsufficientDataError {
            requested: count.get(),
            start,
            end,
            bars: newest_first,
        });
    }

    let sum: f64 = newest_first.iter().map(|bar| bar.field(field)).sum();
    Ok(sum / f64::from(count.get()))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn window_bounds() -> (DateTime<Tz>, DateTime<Tz>) {
        let tz = chrono_tz::America::New_York;
        (
            tz.with_ymd_and_hms(2016, 10, 1, 0, 0, 0).single().unwrap(),
            tz.with_ymd_and_hms(2016, 11, 28, 16, 0, 0).single().unwrap(),
        )
    }

    fn bars(n: u32) -> Vec<Bar> {
        (0..n)
            .map(|i| Bar {
                timestamp: Utc.with_ymd_and_hms(2016, 11, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::days(i64::from(i)),
                open: f64::from(i),
                high: f64::from(i) + 2.0,
                low: f64::from(i) - 2.0,
                close: f64::from(i) + 1.0,
            })
            .collect()
    }

    fn n(v: u32) -> NonZeroU32 {
        NonZeroU32::new(v).unwrap()
    }

    #[test]
    fn exact_mean_over_thirty_closes() {
        let (start, end) = window_bounds();
        let sma = aggregate(n(30), &bars(30), BarField::Close, start, end).unwrap();
        // closes are 1..=30 → mean 15.5
        assert_eq!(sma, 15.5);
    }

    #[test]
    fn newest_bars_win_when_over_delivered() {
        let (start, end) = window_bounds();
        let mut shuffled = bars(40);
        shuffled.reverse();
        let sma = aggregate(n(10), &shuffled, BarField::Close, start, end).unwrap();
        // newest 10 of 40 → closes 31..=40 → mean 35.5
        assert_eq!(sma, 35.5);
    }

    #[test]
    fn avg_field_uses_high_low_midpoint() {
        let (start, end) = window_bounds();
        let sma = aggregate(n(30), &bars(30), BarField::Avg, start, end).unwrap();
        // (high+low)/2 == open for these bars → mean of 0..=29
        assert_eq!(sma, 14.5);
    }

    #[test]
    fn short_batch_fails_listing_every_delivered_bar() {
        let (start, end) = window_bounds();
        let err = aggregate(n(30), &bars(20), BarField::Close, start, end).expect_err("short");
        assert_eq!(err.requested, 30);
        assert_eq!(err.bars.len(), 20);
        // Newest first, and the message names the window and the shortfall.
        assert!(err.bars[0].timestamp > err.bars[19].timestamp);
        let msg = err.to_string();
        assert!(msg.contains("expected 30 bars"));
        assert!(msg.contains("delivered 20"));
    }
}
