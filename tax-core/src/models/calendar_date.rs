//! Serde helpers for calendar dates.
//!
//! Dates are written as `YYYY-MM-DD`. On input a full timestamp is also
//! accepted (`2025-01-01T00:00:00`, with optional fraction and offset); the
//! time of day is dropped.
//!
//! Only years 0000 through 9999 are accepted. Stores compare dates in their
//! four-digit text form, which stops sorting chronologically once chrono
//! adds a sign for wider years.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("{0}")]
    Format(#[from] chrono::ParseError),

    #[error("year {0} is outside {MIN_YEAR}-{MAX_YEAR}")]
    YearOutOfRange(i32),
}

/// Parse a calendar date, discarding any time-of-day component.
pub fn parse(s: &str) -> Result<NaiveDate, DateError> {
    let s = s.trim();
    let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return Err(DateError::YearOutOfRange(date.year()));
    }
    Ok(date)
}

pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&date.format(DATE_FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(|e| serde::de::Error::custom(format!("invalid date '{s}': {e}")))
}
