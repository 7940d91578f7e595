//! Generation clock — owns the "now" anchor every stage measures against.
//!
//! RULE: No stage reads the wall clock. The anchor is injected once at
//! engine construction (the runner passes real time, tests pass a fixed
//! timestamp) so a run is fully determined by (seed, anchor, config).

use crate::rng::GenRng;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Canonical timestamp format for every text date column in the sink.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn fmt_ts(ts: NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

pub fn parse_ts(raw: &str) -> Result<NaiveDateTime, chrono::format::ParseError> {
    NaiveDateTime::parse_from_str(raw, TS_FORMAT)
}

/// Calendar-aware month shift with end-of-month clamping:
/// Jan 31 + 1 month = Feb 28 (or 29).
pub fn add_months(ts: NaiveDateTime, delta: i32) -> NaiveDateTime {
    let months0 = ts.year() * 12 + ts.month() as i32 - 1 + delta;
    let year = months0.div_euclid(12);
    let month = months0.rem_euclid(12) as u32 + 1;
    let day = ts.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid shifted date")
        .and_time(ts.time())
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid next month");
    (next - first).num_days() as u32
}

/// Uniform timestamp in [start, end], second granularity, inclusive.
pub fn uniform_datetime(rng: &mut GenRng, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
    assert!(start <= end, "uniform_datetime: start must be <= end");
    let span = (end - start).num_seconds();
    start + Duration::seconds(rng.int_in(0, span))
}

/// `YYYY-MM` key used by the acquisition plan and the spend/traffic tables.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct GenClock {
    now: NaiveDateTime,
}

impl GenClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn days_ago(&self, n: i64) -> NaiveDateTime {
        self.now - Duration::days(n)
    }

    pub fn months_ago(&self, n: i32) -> NaiveDateTime {
        add_months(self.now, -n)
    }

    /// First days of the historical window: every calendar month from
    /// `months_back` months ago through one month ago, oldest first.
    pub fn history_months(&self, months_back: u32) -> Vec<NaiveDate> {
        let mut months = Vec::with_capacity(months_back as usize);
        for back in (1..=months_back as i32).rev() {
            let shifted = self.months_ago(back);
            months.push(
                NaiveDate::from_ymd_opt(shifted.year(), shifted.month(), 1)
                    .expect("valid first of month"),
            );
        }
        months
    }

    /// Inclusive [start, end] window of one calendar month, where end is
    /// the last day of the month at midnight.
    pub fn month_window(&self, first_day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = first_day.and_hms_opt(0, 0, 0).expect("midnight");
        let last_day = days_in_month(first_day.year(), first_day.month());
        let end = first_day
            .with_day(last_day)
            .expect("valid last day")
            .and_hms_opt(0, 0, 0)
            .expect("midnight");
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> NaiveDateTime {
        parse_ts(raw).unwrap()
    }

    #[test]
    fn add_months_clamps_to_month_end() {
        assert_eq!(add_months(ts("2025-01-31 12:00:00"), 1), ts("2025-02-28 12:00:00"));
        assert_eq!(add_months(ts("2024-01-31 00:00:00"), 1), ts("2024-02-29 00:00:00"));
        assert_eq!(add_months(ts("2025-03-15 08:30:00"), -3), ts("2024-12-15 08:30:00"));
    }

    #[test]
    fn history_months_spans_window_oldest_first() {
        let clock = GenClock::new(ts("2025-06-15 10:00:00"));
        let months = clock.history_months(36);
        assert_eq!(months.len(), 36);
        assert_eq!(months[0], NaiveDate::from_ymd_opt(2022, 6, 1).unwrap());
        assert_eq!(months[35], NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
    }

    #[test]
    fn roundtrip_timestamp_format() {
        let t = ts("2024-11-03 23:59:59");
        assert_eq!(parse_ts(&fmt_ts(t)).unwrap(), t);
    }
}
