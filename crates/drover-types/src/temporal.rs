use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Spreadsheet day-serial epoch (Excel convention: day 1 = 1899-12-31,
/// with the historical off-by-one baked in, so the epoch is 1899-12-30).
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("fixed epoch date")
}

/// Widest day-serial we accept; anything outside is a typo, not a date.
/// 3_000 ≈ 1908, 73_000 ≈ 2099.
const SERIAL_MIN: f64 = 3_000.0;
const SERIAL_MAX: f64 = 73_000.0;

/// A date field as it arrives from callers and intake sheets: either an
/// ISO-8601 string or a spreadsheet-style numeric day-serial.
///
/// Both forms normalize to a UTC-midnight timestamp. Input that parses to
/// neither is a validation error, never a silent null.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Serial(f64),
    Text(String),
}

impl DateInput {
    /// Normalize to a UTC-midnight timestamp.
    pub fn normalize(&self) -> Result<DateTime<Utc>, TypeError> {
        match self {
            Self::Serial(serial) => from_day_serial(*serial),
            Self::Text(raw) => parse_event_date(raw),
        }
    }
}

/// Midnight UTC on the given calendar date.
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0).expect("midnight exists"),
        Utc,
    )
}

/// Parse a textual event date.
///
/// Accepted forms: `YYYY-MM-DD`, an RFC 3339 timestamp (time-of-day and
/// offset are discarded), or a day-serial that arrived as text (a bare
/// number is common in spreadsheet exports).
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, TypeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TypeError::UnparseableDate(raw.to_string()));
    }

    if let Ok(serial) = trimmed.parse::<f64>() {
        return from_day_serial(serial);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(utc_midnight(date));
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(utc_midnight(ts.with_timezone(&Utc).date_naive()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Ok(utc_midnight(date));
    }

    Err(TypeError::UnparseableDate(raw.to_string()))
}

/// Convert a spreadsheet day-serial to a UTC-midnight timestamp.
/// Fractional parts (time-of-day in spreadsheet terms) are discarded.
pub fn from_day_serial(serial: f64) -> Result<DateTime<Utc>, TypeError> {
    if !serial.is_finite() || !(SERIAL_MIN..=SERIAL_MAX).contains(&serial) {
        return Err(TypeError::DaySerialOutOfRange(serial));
    }
    let date = serial_epoch() + Duration::days(serial.trunc() as i64);
    Ok(utc_midnight(date))
}
