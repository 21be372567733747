use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::borrow::Cow;

use super::normalize::MentionFields;
use crate::error::ValidationError;

/// Fields every mention must carry, checked in this order.
pub const REQUIRED_FIELDS: [&str; 6] = ["text", "source", "url", "author", "date", "status"];

/// Borrowed view over a record whose required fields are all present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredFields<'a> {
    pub text: &'a str,
    pub source: &'a str,
    pub url: &'a str,
    pub author: &'a str,
    pub date: &'a str,
    pub status: &'a str,
}

fn field<'a>(fields: &'a MentionFields, name: &str) -> Option<&'a str> {
    match name {
        "text" => fields.text.as_deref(),
        "source" => fields.source.as_deref(),
        "url" => fields.url.as_deref(),
        "author" => fields.author.as_deref(),
        "date" => fields.date.as_deref(),
        "status" => fields.status.as_deref(),
        _ => None,
    }
}

/// Fails on the first absent required field. `id` is not checked and empty
/// strings count as present.
pub fn validate_required(fields: &MentionFields) -> Result<RequiredFields<'_>, ValidationError> {
    for name in REQUIRED_FIELDS {
        if field(fields, name).is_none() {
            return Err(ValidationError::MissingField(name));
        }
    }

    let get = |name| field(fields, name).unwrap_or_default();
    Ok(RequiredFields {
        text: get("text"),
        source: get("source"),
        url: get("url"),
        author: get("author"),
        date: get("date"),
        status: get("status"),
    })
}

// Each offset form has a naive twin; hour-only times are widened to `HH:00` first.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// `2024-01-01T12` / `2024-01-01 12+02:00` → same with `:00` minutes.
fn widen_hour_only(value: &str) -> Cow<'_, str> {
    let bytes = value.as_bytes();
    let hour_only = bytes.len() >= 13
        && matches!(bytes[10], b'T' | b' ')
        && bytes[11].is_ascii_digit()
        && bytes[12].is_ascii_digit()
        && matches!(bytes.get(13), None | Some(b'+') | Some(b'-'));
    if hour_only {
        Cow::Owned(format!("{}:00{}", &value[..13], &value[13..]))
    } else {
        Cow::Borrowed(value)
    }
}

/// Parse an ISO-8601 date or date-time. A trailing `Z` means `+00:00`;
/// values without an offset are taken as UTC. Surrounding whitespace is
/// rejected.
pub fn parse_iso_datetime(value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() || value.trim() != value {
        return None;
    }
    let value = value.replace('Z', "+00:00");
    let value = widen_hour_only(&value);

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&value, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&value, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Check `date` is ISO-8601 and hand it back unchanged.
pub fn validate_date(date: &str) -> Result<&str, ValidationError> {
    match parse_iso_datetime(date) {
        Some(_) => Ok(date),
        None => Err(ValidationError::InvalidDate(date.to_string())),
    }
}
