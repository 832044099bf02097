//! Date parsing for API payloads.
//!
//! All timestamps are interpreted as UTC; the time zone reported by the API
//! is carried separately in the series metadata.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{DataError, Result};

/// Format of daily dates (`2025-08-19`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of intraday timestamps (`2025-08-19 15:55:00`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DataError::Parse(format!("invalid date '{s}': {e}")))
}

/// Parses a `YYYY-MM-DD` date as midnight UTC.
pub fn parse_date_utc(s: &str) -> Result<DateTime<Utc>> {
    Ok(date_to_utc(parse_date(s)?))
}

/// Parses a `YYYY-MM-DD HH:MM:SS` timestamp as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|e| DataError::Parse(format!("invalid timestamp '{s}': {e}")))
}

/// Converts a date to midnight UTC.
#[must_use]
pub fn date_to_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_date() {
        let d = parse_date("2025-08-19").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2025, 8, 19));
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("19/08/2025").is_err());
    }

    #[test]
    fn test_parse_date_utc_is_midnight() {
        let t = parse_date_utc("2025-08-19").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2025, 8, 19, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp() {
        let t = parse_timestamp("2025-08-27 11:25:19").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (11, 25, 19));
        assert!(parse_timestamp("2025-08-27").is_err());
    }
}
