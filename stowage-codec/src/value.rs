//! The canonical in-memory representation of stowed values.

use chrono::{DateTime, NaiveDate, Utc};

use crate::FieldType;

/// A canonical typed value for a stowed field.
///
/// [`cast`](crate::cast) produces exactly one variant per declared
/// [`FieldType`]; equality on canonical values is what drives change
/// detection in the accessor layer.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// UTF-8 text.
    Text(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// Finite 64-bit float.
    Float(f64),
    /// Normalized decimal text: no sign on zero, no leading or trailing
    /// zero noise, no exponent.
    Decimal(String),
    /// Point in time, truncated to whole seconds.
    Time(DateTime<Utc>),
    /// Calendar date.
    Date(NaiveDate),
    /// Boolean.
    Boolean(bool),
    /// Ordered sequence of nested canonical values.
    Array(Vec<StoredValue>),
}

impl StoredValue {
    /// The declared type this variant belongs to.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            StoredValue::Text(_) => FieldType::String,
            StoredValue::Integer(_) => FieldType::Integer,
            StoredValue::Float(_) => FieldType::Float,
            StoredValue::Decimal(_) => FieldType::Decimal,
            StoredValue::Time(_) => FieldType::Time,
            StoredValue::Date(_) => FieldType::Date,
            StoredValue::Boolean(_) => FieldType::Boolean,
            StoredValue::Array(_) => FieldType::Array,
        }
    }

    /// True when the value carries no meaningful content: empty or
    /// whitespace-only text, an empty array, or `false`.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            StoredValue::Text(text) => text.trim().is_empty(),
            StoredValue::Array(items) => items.is_empty(),
            StoredValue::Boolean(value) => !value,
            _ => false,
        }
    }

    /// The text content, if this is a `Text` value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The integer content, if this is an `Integer` value.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            StoredValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The float content, if this is a `Float` value.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            StoredValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The normalized decimal text, if this is a `Decimal` value.
    #[must_use]
    pub fn as_decimal(&self) -> Option<&str> {
        match self {
            StoredValue::Decimal(text) => Some(text),
            _ => None,
        }
    }

    /// The timestamp, if this is a `Time` value.
    #[must_use]
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredValue::Time(value) => Some(*value),
            _ => None,
        }
    }

    /// The date, if this is a `Date` value.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            StoredValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// The boolean content, if this is a `Boolean` value.
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            StoredValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// The element slice, if this is an `Array` value.
    #[must_use]
    pub fn as_array(&self) -> Option<&[StoredValue]> {
        match self {
            StoredValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Text(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Text(value)
    }
}

impl From<i32> for StoredValue {
    fn from(value: i32) -> Self {
        StoredValue::Integer(i64::from(value))
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        StoredValue::Integer(value)
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        StoredValue::Float(value)
    }
}

impl From<bool> for StoredValue {
    fn from(value: bool) -> Self {
        StoredValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for StoredValue {
    fn from(value: DateTime<Utc>) -> Self {
        StoredValue::Time(value)
    }
}

impl From<NaiveDate> for StoredValue {
    fn from(value: NaiveDate) -> Self {
        StoredValue::Date(value)
    }
}

impl<T: Into<StoredValue>> From<Vec<T>> for StoredValue {
    fn from(items: Vec<T>) -> Self {
        StoredValue::Array(items.into_iter().map(Into::into).collect())
    }
}
