//! Date and time parsing and calendar boundaries
//!
//! Field values arrive as strings in a handful of shapes (RFC 3339 timestamps
//! from the API, bare `YYYY-MM-DD` dates from date pickers, space-separated
//! database timestamps). Values without an offset are read as wall-clock time
//! in the caller's offset.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone,
};

use lv_core::types::FieldValue;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date/time string into an instant.
///
/// Returns `None` for anything that is not a recognizable calendar date.
pub fn parse_instant(text: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(offset));
    }
    if let Some(normalized) = text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
        // "2024-01-15 10:00:00Z"
        for fmt in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(normalized, fmt) {
                return Some(naive.and_utc().with_timezone(offset));
            }
        }
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt.with_timezone(offset));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(offset));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return at_offset(naive, offset);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return start_of_day(date, offset);
        }
    }
    None
}

/// Instant held by a field value.
///
/// Text is parsed with [`parse_instant`]; numbers are epoch milliseconds.
pub fn instant_from_value(value: &FieldValue, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    match value {
        FieldValue::Text(text) => parse_instant(text, offset),
        FieldValue::Number(millis) if millis.is_finite() => {
            DateTime::from_timestamp_millis(millis.trunc() as i64)
                .map(|dt| dt.with_timezone(offset))
        }
        _ => None,
    }
}

/// Wall-clock time in `offset`
pub fn at_offset(naive: NaiveDateTime, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.from_local_datetime(&naive).single()
}

/// First instant of a calendar day
pub fn start_of_day(date: NaiveDate, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    at_offset(date.and_time(NaiveTime::MIN), offset)
}

/// Last representable instant of a calendar day
pub fn end_of_day(date: NaiveDate, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    at_offset(date.and_hms_nano_opt(23, 59, 59, 999_999_999)?, offset)
}

/// First day of the week containing `date`.
///
/// `first_day_of_week` counts from Sunday (0) to Saturday (6).
pub fn start_of_week(date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
    let first = u32::from(first_day_of_week % 7);
    let back = (date.weekday().num_days_from_sunday() + 7 - first) % 7;
    date - Duration::days(i64::from(back))
}

/// Last day of the week containing `date`
pub fn end_of_week(date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
    start_of_week(date, first_day_of_week) + Duration::days(6)
}

/// First day of the month containing `date`
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}
