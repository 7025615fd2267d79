mod common;

use std::num::NonZeroU32;

use historical_sma::{BarField, EndTime, aggregate, plan_request_at};

use common::{at, daily_bars, fixture_2016};

fn n(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap()
}

/// The full pipeline as a collaborator would drive it: plan the request,
/// "receive" a finalized batch, aggregate the SMA.
#[test]
fn thirty_day_close_sma() {
    let cal = fixture_2016();
    let end = at(&cal, 2016, 11, 28, 16, 0, 0);
    let now = end.with_timezone(&chrono::Local);

    let request = plan_request_at(n(30), "1 day", EndTime::Exchange(end), &cal, now).unwrap();
    assert_eq!(request.bar_size_wire, "1 day");

    // The source over-delivers (the descriptor rounds up); the newest 30
    // close values are 11..=40, mean 25.5.
    let bars = daily_bars(40, 2016, 11, 28, 0.0);
    let sma = aggregate(n(30), &bars, BarField::Close, request.window.start, end).unwrap();
    assert_eq!(sma, 25.5);
}

#[test]
fn avg_field_takes_the_high_low_midpoint() {
    let cal = fixture_2016();
    let end = at(&cal, 2016, 11, 28, 16, 0, 0);
    let bars = daily_bars(30, 2016, 11, 28, 10.0);

    let start = at(&cal, 2016, 10, 1, 0, 0, 0);
    let sma = aggregate(n(30), &bars, BarField::Avg, start, end).unwrap();
    // (high+low)/2 collapses to the open: 10..=39, mean 24.5.
    assert_eq!(sma, 24.5);
}

#[test]
fn short_delivery_reports_every_bar_it_did_get() {
    let cal = fixture_2016();
    let end = at(&cal, 2016, 11, 28, 16, 0, 0);
    let start = at(&cal, 2016, 10, 1, 0, 0, 0);

    let bars = daily_bars(20, 2016, 11, 28, 0.0);
    let err = aggregate(n(30), &bars, BarField::Close, start, end).expect_err("short");
    assert_eq!(err.requested, 30);
    assert_eq!(err.bars.len(), 20);

    let msg = err.to_string();
    assert!(msg.contains("expected 30 bars"));
    // Every delivered bar is listed for diagnosis.
    assert_eq!(msg.lines().count(), 21);
}

#[test]
fn unknown_field_is_rejected_before_any_arithmetic() {
    let err = "vwap".parse::<BarField>().expect_err("must fail");
    assert!(err.to_string().contains("vwap"));
}

#[test]
fn one_second_bars_request_the_quirked_wire_form() {
    let cal = fixture_2016();
    let end = at(&cal, 2016, 11, 28, 16, 0, 0);
    let now = end.with_timezone(&chrono::Local);

    let request = plan_request_at(n(30), "1 sec", EndTime::Exchange(end), &cal, now).unwrap();
    assert_eq!(request.bar_size_wire, "1 secs");
    // 30 trading seconds + 2-second backoff.
    assert_eq!(request.duration_wire, "32 S");
}
