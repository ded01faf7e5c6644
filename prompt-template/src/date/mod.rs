//! Date parsing, pattern formatting and calendar arithmetic for the date functions.
//!
//! All values are handled as local wall time ([`NaiveDateTime`] in the process time zone),
//! so a date string shifted and re-formatted stays on the same clock reading.

mod pattern;

use std::fmt::Write;

use chrono::{DateTime, Local, Months, NaiveDate, NaiveDateTime, TimeDelta};
use serde_json::Value;
use thiserror::Error;

pub use pattern::compile as compile_pattern;

/// Pattern used when the caller passes null or a blank pattern.
pub const DEFAULT_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("unsupported pattern field '{letter}' x{count}")]
    UnsupportedField { letter: char, count: usize },
    #[error("unterminated quote in pattern `{0}`")]
    UnterminatedQuote(String),
    #[error("cannot format date with pattern `{0}`")]
    Format(String),
    #[error("unknown time unit `{0}`")]
    UnknownUnit(String),
    #[error("date arithmetic out of range")]
    OutOfRange,
    #[error("cannot read a date from a {0} value")]
    UnsupportedValue(&'static str),
}

/// A calendar unit accepted by `dateAdd` / `dateSub`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    /// Parses singular or plural unit names, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, DateError> {
        let unit = match raw.trim().to_ascii_lowercase().as_str() {
            "second" | "seconds" => TimeUnit::Seconds,
            "minute" | "minutes" => TimeUnit::Minutes,
            "hour" | "hours" => TimeUnit::Hours,
            "day" | "days" => TimeUnit::Days,
            "week" | "weeks" => TimeUnit::Weeks,
            "month" | "months" => TimeUnit::Months,
            "year" | "years" => TimeUnit::Years,
            _ => return Err(DateError::UnknownUnit(raw.to_string())),
        };
        Ok(unit)
    }
}

/// Formats `value` with a letter pattern; `None` or blank uses [`DEFAULT_PATTERN`].
pub fn format(value: &NaiveDateTime, pattern: Option<&str>) -> Result<String, DateError> {
    let pattern = pattern
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PATTERN);
    let spec = compile_pattern(pattern)?;
    let mut out = String::new();
    write!(out, "{}", value.format(&spec)).map_err(|_| DateError::Format(pattern.to_string()))?;
    Ok(out)
}

/// Reads a date-like value as local wall time.
///
/// Accepts epoch milliseconds (number or digit string), RFC 3339 instants, ISO local
/// date-times (`T` or space separated) and ISO dates (midnight). Null and unparsable
/// strings yield `Ok(None)`; booleans, lists and maps are rejected.
pub fn read_value(value: &Value) -> Result<Option<NaiveDateTime>, DateError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(from_epoch_millis)),
        Value::String(s) => Ok(parse_text(s.trim())),
        other => Err(DateError::UnsupportedValue(crate::value::type_name(other))),
    }
}

fn from_epoch_millis(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|utc| utc.with_timezone(&Local).naive_local())
}

fn parse_text(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<i64>().ok().and_then(from_epoch_millis);
    }
    None
}

/// Shifts `value` by `amount` units. Month and year steps clamp to the last valid day.
pub fn shift(value: NaiveDateTime, amount: i64, unit: TimeUnit) -> Result<NaiveDateTime, DateError> {
    let seconds_per = match unit {
        TimeUnit::Seconds => Some(1),
        TimeUnit::Minutes => Some(60),
        TimeUnit::Hours => Some(3_600),
        TimeUnit::Days => Some(86_400),
        TimeUnit::Weeks => Some(604_800),
        TimeUnit::Months | TimeUnit::Years => None,
    };
    if let Some(per) = seconds_per {
        let delta = amount
            .checked_mul(per)
            .and_then(TimeDelta::try_seconds)
            .ok_or(DateError::OutOfRange)?;
        return value.checked_add_signed(delta).ok_or(DateError::OutOfRange);
    }

    let months = match unit {
        TimeUnit::Years => amount.checked_mul(12).ok_or(DateError::OutOfRange)?,
        _ => amount,
    };
    let step = u32::try_from(months.unsigned_abs()).map_err(|_| DateError::OutOfRange)?;
    let shifted = if months >= 0 {
        value.checked_add_months(Months::new(step))
    } else {
        value.checked_sub_months(Months::new(step))
    };
    shifted.ok_or(DateError::OutOfRange)
}
