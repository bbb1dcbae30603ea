//! Scalar values and the reserved helper dispatch table.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat};

/// A scalar read out of or written into a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Plain text
    Str(String),
    /// Calendar date
    Date(NaiveDate),
    /// Wall-clock time
    Time(NaiveTime),
    /// Datetime with a UTC offset
    DateTime(DateTime<FixedOffset>),
}

impl Value {
    /// Fixed stringification rule used when writing values into the tree.
    ///
    /// Booleans become `"true"`/`"false"` so written values round-trip
    /// through [`crate::helpers::to_bool`]; dates are `YYYY-MM-DD`, times
    /// `HH:MM:SS`, datetimes RFC 3339 with seconds precision.
    pub fn to_text(&self) -> String {
        match self {
            Value::Bool(true) => "true".to_string(),
            Value::Bool(false) => "false".to_string(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Str(value) => value.clone(),
            Value::Date(value) => value.format("%Y-%m-%d").to_string(),
            Value::Time(value) => value.format("%H:%M:%S").to_string(),
            Value::DateTime(value) => value.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::DateTime(value)
    }
}

/// Reserved helper names, dispatched before any child lookup.
///
/// A child tag that normalizes to one of these names is shadowed: normalized
/// lookup reports the helper, never the child. The child stays reachable
/// through exact dictionary-style access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Helper {
    /// Text content, no conversion
    Get,
    /// [`crate::XmlMap::to_bool`]
    ToBool,
    /// [`crate::XmlMap::to_int`]
    ToInt,
    /// [`crate::XmlMap::to_float`]
    ToFloat,
    /// [`crate::XmlMap::to_str`]
    ToStr,
    /// Alias of [`Helper::ToStr`]
    ToString,
    /// [`crate::XmlMap::to_date`]
    ToDate,
    /// [`crate::XmlMap::to_time`]
    ToTime,
    /// [`crate::XmlMap::to_datetime`]
    ToDateTime,
}

impl Helper {
    /// Every reserved name.
    pub const NAMES: [&'static str; 9] = [
        "get",
        "to_bool",
        "to_int",
        "to_float",
        "to_str",
        "to_string",
        "to_date",
        "to_time",
        "to_datetime",
    ];

    /// The fixed dispatch table.
    pub fn from_name(name: &str) -> Option<Helper> {
        match name {
            "get" => Some(Helper::Get),
            "to_bool" => Some(Helper::ToBool),
            "to_int" => Some(Helper::ToInt),
            "to_float" => Some(Helper::ToFloat),
            "to_str" => Some(Helper::ToStr),
            "to_string" => Some(Helper::ToString),
            "to_date" => Some(Helper::ToDate),
            "to_time" => Some(Helper::ToTime),
            "to_datetime" => Some(Helper::ToDateTime),
            _ => None,
        }
    }
}
