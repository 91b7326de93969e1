//! Calendar date parsing for the date comparator.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use linkage_model::FieldValue;

/// Patterns tried after the ISO 8601 forms, in order.
const COMMON_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Looser patterns tried last.
const PERMISSIVE_FORMATS: [&str; 8] = [
    "%d.%m.%Y",
    "%m-%d-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

const ISO_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a value as a calendar date, dropping any time component.
pub fn parse_date(value: &FieldValue) -> Option<NaiveDate> {
    let text = value.as_text()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_iso(text)
        .or_else(|| parse_with(text, &COMMON_FORMATS))
        .or_else(|| parse_permissive(text))
}

fn parse_iso(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    if let Some(datetime) = ISO_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(datetime.date());
    }
    if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(text, "%Y%m%d").ok();
    }
    None
}

fn parse_with(text: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn parse_permissive(text: &str) -> Option<NaiveDate> {
    parse_with(text, &PERMISSIVE_FORMATS)
        .or_else(|| DateTime::parse_from_rfc2822(text).ok().map(|dt| dt.date_naive()))
}
