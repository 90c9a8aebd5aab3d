//! Calendar-date coercion for event dates.
//!
//! Admin forms send `YYYY-MM-DD`, `datetime-local` values, or the RFC 3339 string a
//! record was served with. All of them collapse to a [`Date`]; the stored timestamp is
//! always midnight UTC of that day so a date-only input never drifts across zones.

use branford_api_types::dates;
use time::{Date, OffsetDateTime};

use super::error::ValidationError;

pub use branford_api_types::dates::format_calendar_date;

/// Coerce raw input into a calendar date. Never falls back to today.
pub fn parse_calendar_date(raw: &str) -> Result<Date, ValidationError> {
    dates::parse_calendar_date(raw).ok_or_else(|| ValidationError::InvalidDate(raw.to_string()))
}

/// The absolute timestamp stored for a calendar date.
pub fn storage_timestamp(date: Date) -> OffsetDateTime {
    date.midnight().assume_utc()
}
