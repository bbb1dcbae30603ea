//! Tag-name normalization and the converters behind the `to_*` helpers.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::error::{Error, Result};

/// Normalizes a tag name for attribute-style lookup: every character
/// lowercased, every hyphen replaced with an underscore.
///
/// Normalization is a lookup-key concern only; stored tag names are never
/// rewritten.
pub fn normalize_tag(tag: &str) -> String {
    tag.to_lowercase().replace('-', "_")
}

/// Tokens [`to_bool`] accepts as `true`, compared case-insensitively.
pub const TRUE_TOKENS: [&str; 4] = ["1", "true", "yes", "on"];

/// Tokens [`to_bool`] accepts as `false`, compared case-insensitively.
pub const FALSE_TOKENS: [&str; 4] = ["0", "false", "no", "off"];

pub(crate) fn empty_value() -> Error {
    Error::Conversion("empty value not allowed".to_string())
}

/// Converts a fixed set of textual tokens to a boolean.
pub fn to_bool(value: &str) -> Result<bool> {
    let lower = value.to_lowercase();
    if TRUE_TOKENS.contains(&lower.as_str()) {
        Ok(true)
    } else if FALSE_TOKENS.contains(&lower.as_str()) {
        Ok(false)
    } else {
        Err(Error::Conversion(format!(
            "cannot interpret {value:?} as a boolean"
        )))
    }
}

/// Standard integer parse.
pub fn to_int(value: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| {
        Error::Conversion(format!("cannot interpret {value:?} as an integer"))
    })
}

/// Standard float parse.
pub fn to_float(value: &str) -> Result<f64> {
    value.trim().parse().map_err(|_| {
        Error::Conversion(format!("cannot interpret {value:?} as a number"))
    })
}

/// Parses `YYYY-MM-DD`, or the date part of a full RFC 3339 datetime.
pub fn to_date(value: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|datetime| datetime.date_naive())
        .map_err(|_| Error::Conversion(format!("cannot interpret {value:?} as a date")))
}

/// Parses `HH:MM:SS[.f]` or `HH:MM`; a bare hour means the full hour.
pub fn to_time(value: &str) -> Result<NaiveTime> {
    let padded;
    let value = if (1..=2).contains(&value.len())
        && value.bytes().all(|b| b.is_ascii_digit())
    {
        padded = format!("{value}:00");
        padded.as_str()
    } else {
        value
    };
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| Error::Conversion(format!("cannot interpret {value:?} as a time")))
}

/// Parses the RFC 3339 / ISO 8601 profile
/// `YYYY-MM-DDTHH:MM:SS[.ffffff]±HH:MM`.
pub fn to_datetime(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|_| {
        Error::Conversion(format!("cannot interpret {value:?} as a datetime"))
    })
}
