// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing.

use chrono::{DateTime, NaiveDate, Utc};

/// Which end of a scheduling window a date string describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBound {
    Start,
    End,
}

/// Parse a race window bound.
///
/// Accepts full RFC3339 timestamps or bare `YYYY-MM-DD` dates. A bare date
/// used as an end bound covers the whole day, up to its last nanosecond.
pub fn parse_window_bound(value: &str, bound: WindowBound) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let bound = match bound {
        WindowBound::Start => date.and_hms_opt(0, 0, 0)?,
        WindowBound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999)?,
    };
    Some(bound.and_utc())
}

/// Current wall-clock time as fractional Unix seconds.
pub fn unix_now(now: DateTime<Utc>) -> f64 {
    now.timestamp_millis() as f64 / 1000.0
}
