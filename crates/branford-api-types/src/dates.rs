//! Event date coercion shared by the server and its clients.
//!
//! Accepts `YYYY-MM-DD`, `datetime-local` values with or without seconds, and RFC 3339
//! timestamps, which reduce to their UTC day.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::FormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

const CALENDAR_DATE: &[FormatItem<'static>] =
    format_description!("[year]-[month padding:zero]-[day padding:zero]");
const DATETIME_LOCAL: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const DATETIME_LOCAL_SECONDS: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// The calendar day `raw` names, or `None`. Never falls back to today.
pub fn parse_calendar_date(raw: &str) -> Option<Date> {
    let trimmed = raw.trim();

    if let Ok(date) = Date::parse(trimmed, CALENDAR_DATE) {
        return Some(date);
    }
    if let Ok(timestamp) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(timestamp.to_offset(UtcOffset::UTC).date());
    }
    [DATETIME_LOCAL, DATETIME_LOCAL_SECONDS]
        .into_iter()
        .find_map(|format| PrimitiveDateTime::parse(trimmed, format).ok())
        .map(|local| local.date())
}

/// Canonical `YYYY-MM-DD` text for a calendar date.
pub fn format_calendar_date(date: Date) -> String {
    let (year, month, day) = date.to_calendar_date();
    format!("{year:04}-{:02}-{day:02}", month as u8)
}
