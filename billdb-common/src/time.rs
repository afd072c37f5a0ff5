//! Permissive date and datetime parsing
//!
//! The BILLSTATUS corpus spans schema vintages with inconsistent date
//! encodings: bare dates, `T`- or space-separated timestamps with or without
//! fractional seconds, RFC 3339 with an offset, and occasional US-style
//! `m/d/Y`. Parsing is permissive but strictly scoped: a string that matches
//! none of the known calendar forms yields `None`, it never raises.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a calendar date, or `None` if the string is not interpretable.
///
/// Timestamp strings are accepted and truncated to their date component.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    parse_datetime(s).map(|dt| dt.date())
}

/// Parse a timestamp, or `None` if the string is not interpretable.
///
/// RFC 3339 offsets are normalized to UTC before the offset is dropped.
/// A bare date parses as midnight.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}
