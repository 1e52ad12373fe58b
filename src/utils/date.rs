//! Parsing of date-like front-matter values.
//!
//! YAML front matter keeps dates as plain strings, so `date: 2020-01-01`
//! arrives here as `"2020-01-01"`. Accepted forms:
//!
//! | Input | Example |
//! |-------|---------|
//! | date | `2020-01-01` |
//! | date and time | `2020-01-01 10:30:00`, `2020-01-01T10:30:00`, `2020-01-01 10:30` |
//! | RFC 3339 | `2020-01-01T10:30:00Z`, `2020-01-01T10:30:00+08:00` |

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Write;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a date-like string. RFC 3339 offsets are kept as written (local wall time).
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Calendar date part of a date-like string.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_datetime(s).map(|dt| dt.date())
}

/// Format with a `strftime` pattern.
///
/// Returns `None` if the pattern contains an unknown specifier.
pub fn format_datetime(dt: &NaiveDateTime, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", dt.format(pattern)).ok()?;
    Some(out)
}
