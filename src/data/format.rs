//! Lenient number and timestamp rendering for order fields
//!
//! Feed values arrive as JSON numbers, numeric strings, or free text. Nothing
//! here fails: unparseable input is handed back unchanged so the table can
//! still show what the producer sent.

use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Placeholder shown for missing values
pub const PLACEHOLDER: &str = "-";

/// Decimal places for quantities and percentages
pub const DEFAULT_DECIMALS: u32 = 2;

/// Decimal places for price-like fields
pub const PRICE_DECIMALS: u32 = 4;

/// Render format for parsed timestamps (tr-TR style)
const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Naive layouts accepted in addition to RFC 3339
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Parses a JSON value as a number.
///
/// Accepts JSON numbers and numeric strings (surrounding whitespace, a leading
/// `+`, and a trailing `%` are tolerated). Returns `None` for anything else,
/// including non-finite values.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// Parses a string as a finite number, see [`parse_number`]
pub fn parse_numeric_str(s: &str) -> Option<f64> {
    let trimmed = numeric_body(s)?;
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Strips tolerated decoration, rejecting words like `inf` that `f64` would accept
fn numeric_body(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let looks_numeric = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E' | '+'))
        && trimmed.chars().any(|c| c.is_ascii_digit());
    looks_numeric.then_some(trimmed)
}

/// Formats a value with `decimals` places using half-up rounding.
///
/// `-` and empty strings come back as `-`; values that cannot be read as a
/// number come back as their original text.
pub fn format_number(value: &Value, decimals: u32) -> String {
    match value {
        Value::Null => PLACEHOLDER.to_string(),
        Value::String(s) => format_number_str(s, decimals),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() => round_half_up(&n.to_string(), f, decimals),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// String form of [`format_number`]
pub fn format_number_str(s: &str, decimals: u32) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER {
        return PLACEHOLDER.to_string();
    }
    match numeric_body(trimmed) {
        Some(body) => match body.parse::<f64>() {
            Ok(f) if f.is_finite() => round_half_up(body, f, decimals),
            _ => s.to_string(),
        },
        None => s.to_string(),
    }
}

/// Rounds the decimal text exactly when it fits a `Decimal`, falling back to
/// binary formatting for values outside its range.
fn round_half_up(text: &str, value: f64, decimals: u32) -> String {
    let exact = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .or_else(|_| Decimal::from_str(&value.to_string()));

    match exact {
        Ok(d) => {
            let rounded = d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", decimals as usize, rounded)
        }
        Err(_) => format!("{:.*}", decimals as usize, value),
    }
}

/// Parses a timestamp value.
///
/// Offset-aware strings are converted to local time; naive strings are taken
/// as already local. JSON numbers are epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Local
                .timestamp_millis_opt(millis)
                .single()
                .map(|dt| dt.naive_local())
        }
        _ => None,
    }
}

/// String form of [`parse_timestamp`]
pub fn parse_timestamp_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses an upstream `lastFetch`-style value into UTC
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    if let Value::String(s) = value {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    let naive = parse_timestamp(value)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Renders a timestamp as `DD.MM.YYYY HH:MM:SS`.
///
/// Empty input yields `-`; input that cannot be parsed is returned unchanged.
pub fn format_date_time(value: &Value) -> String {
    match value {
        Value::Null => PLACEHOLDER.to_string(),
        Value::String(s) if s.trim().is_empty() => PLACEHOLDER.to_string(),
        Value::String(s) => parse_timestamp_str(s)
            .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| s.clone()),
        other => parse_timestamp(other)
            .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| other.to_string()),
    }
}
