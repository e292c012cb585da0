//! Formatting of current values for read-only display.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use std::fmt::{self, Write};

use crate::record::value_to_string;

const DATETIME_INPUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const TIME_INPUTS: &[&str] = &["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    DATETIME_INPUTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(raw).map(|dt| dt.date()))
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    TIME_INPUTS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
        .or_else(|| parse_datetime(raw).map(|dt| dt.time()))
}

fn from_epoch(value: &Value) -> Option<NaiveDateTime> {
    value
        .as_i64()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.naive_utc())
}

/// Whether `format` is a usable `strftime` pattern.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Write a chrono formatter into a string. `None` when the pattern is
/// invalid; chrono reports that as a `fmt::Error` from `Display`.
fn write_formatted(formatted: impl fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{formatted}").ok()?;
    Some(out)
}

/// Format a date value. Unparseable values are shown as they are.
pub fn format_date(value: &Value, format: &str) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => parse_date(s)
            .and_then(|d| write_formatted(d.format(format)))
            .unwrap_or_else(|| s.clone()),
        Value::Number(_) => from_epoch(value)
            .and_then(|dt| write_formatted(dt.date().format(format)))
            .unwrap_or_else(|| value_to_string(value)),
        other => value_to_string(other),
    }
}

/// Format a datetime or timestamp value (strings or epoch seconds).
pub fn format_datetime(value: &Value, format: &str) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => parse_datetime(s)
            .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
            .and_then(|dt| write_formatted(dt.format(format)))
            .unwrap_or_else(|| s.clone()),
        Value::Number(_) => from_epoch(value)
            .and_then(|dt| write_formatted(dt.format(format)))
            .unwrap_or_else(|| value_to_string(value)),
        other => value_to_string(other),
    }
}

/// Format a time-of-day value.
pub fn format_time(value: &Value, format: &str) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => parse_time(s)
            .and_then(|t| write_formatted(t.format(format)))
            .unwrap_or_else(|| s.clone()),
        other => value_to_string(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&json!("2024-03-09"), "%d/%m/%Y"), "09/03/2024");
        assert_eq!(
            format_date(&json!("2024-03-09T10:11:12Z"), "%Y-%m-%d"),
            "2024-03-09"
        );
        assert_eq!(format_date(&json!("soon"), "%Y"), "soon");
        assert_eq!(format_date(&Value::Null, "%Y"), "");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(
            format_datetime(&json!("2024-03-09 10:11:12"), "%Y-%m-%d %H:%M"),
            "2024-03-09 10:11"
        );
        assert_eq!(
            format_datetime(&json!(0), "%Y-%m-%d %H:%M"),
            "1970-01-01 00:00"
        );
        assert_eq!(
            format_datetime(&json!("2024-03-09"), "%Y-%m-%d %H:%M"),
            "2024-03-09 00:00"
        );
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(&json!("07:05:00"), "%H:%M"), "07:05");
        assert_eq!(format_time(&json!("2024-03-09 18:30:00"), "%H:%M"), "18:30");
        assert_eq!(format_time(&json!("noon"), "%H:%M"), "noon");
    }

    #[test]
    fn test_invalid_pattern_shows_raw_value() {
        assert!(!is_valid_format("%Q"));
        assert!(is_valid_format("%d/%m/%Y"));
        assert_eq!(format_date(&json!("2024-01-02"), "%Q"), "2024-01-02");
        assert_eq!(format_date(&json!(0), "%Q"), "0");
        assert_eq!(
            format_datetime(&json!("2024-01-02 10:00:00"), "%Y %Q"),
            "2024-01-02 10:00:00"
        );
        assert_eq!(format_time(&json!("07:05"), "%Q"), "07:05");
    }
}
