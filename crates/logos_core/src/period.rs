//! crates/logos_core/src/period.rs
//!
//! Calendar-month accounting periods for the usage counter.

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// The half-open UTC calendar month `[start, end)` a usage counter row
/// belongs to. `start` is the row's identity within the uniqueness
/// constraint, so two calls with timestamps in the same month must produce
/// bit-identical bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsagePeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl UsagePeriod {
    /// The period containing `at`. Computed from the given wall-clock
    /// instant every time, never cached, so a request arriving at a month
    /// boundary is attributed to the month containing its timestamp.
    pub fn containing(at: DateTime<Utc>) -> UsagePeriod {
        let (year, month) = (at.year(), at.month());
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        UsagePeriod {
            start: month_start(year, month),
            end: month_start(next_year, next_month),
        }
    }
}

fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    // Midnight on the first of a month is always a valid UTC instant.
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("first instant of a month exists in UTC")
}
