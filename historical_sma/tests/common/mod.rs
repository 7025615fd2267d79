#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use exchange_calendar::{ExchangeCalendar, load_calendar_str};
use historical_sma::Bar;

/// The 2016 US holiday set, loaded through the TOML config path so the
/// fixture exercises the same startup surface real configurations use.
pub fn fixture_2016() -> ExchangeCalendar {
    load_calendar_str(
        r#"
timezone = "America/New_York"
open = "09:30"
normal_close = "16:00"
early_close = "13:00"

[[holidays]]
date = "1/1/2016"
kind = "full day"

[[holidays]]
date = "1/18/2016"
kind = "full day"

[[holidays]]
date = "2/15/2016"
kind = "full day"

[[holidays]]
date = "3/25/2016"
kind = "full day"

[[holidays]]
date = "5/30/2016"
kind = "full day"

[[holidays]]
date = "7/3/2016"
kind = "early close"

[[holidays]]
date = "7/4/2016"
kind = "full day"

[[holidays]]
date = "9/5/2016"
kind = "full day"

[[holidays]]
date = "11/25/2016"
kind = "early close"

[[holidays]]
date = "12/26/2016"
kind = "full day"
"#,
    )
    .expect("fixture calendar")
}

pub fn at(cal: &ExchangeCalendar, y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Tz> {
    cal.timezone().with_ymd_and_hms(y, m, d, h, min, s).single().unwrap()
}

/// `n` daily bars ending on `last_day` (UTC midnights), oldest first, with
/// closes `base+1 ..= base+n`.
pub fn daily_bars(n: u32, last_y: i32, last_m: u32, last_d: u32, base: f64) -> Vec<Bar> {
    let last = Utc.with_ymd_and_hms(last_y, last_m, last_d, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let offset = i64::from(n - 1 - i);
            Bar {
                timestamp: last - chrono::Duration::days(offset),
                open: base + f64::from(i),
                high: base + f64::from(i) + 2.0,
                low: base + f64::from(i) - 2.0,
                close: base + f64::from(i) + 1.0,
            }
        })
        .collect()
}
