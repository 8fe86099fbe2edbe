//! The closed set of declarable field types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CodecError;

/// The declared type of a stowed field.
///
/// Field declarations name one of these; anything else is rejected at
/// declaration time with [`CodecError::InvalidDataType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// UTF-8 text.
    String,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit float. Non-finite values are rejected at cast time.
    Float,
    /// Exact decimal, stored as normalized decimal text.
    Decimal,
    /// Point in time with whole-second precision, stored as epoch seconds.
    Time,
    /// Calendar date, stored as ISO 8601 text.
    Date,
    /// Boolean, stored as `true` / `false` text.
    Boolean,
    /// Ordered sequence of nested values, stored as a JSON array.
    Array,
}

impl FieldType {
    /// Every supported type, in declaration-table order.
    pub const ALL: [FieldType; 8] = [
        FieldType::String,
        FieldType::Integer,
        FieldType::Float,
        FieldType::Decimal,
        FieldType::Time,
        FieldType::Date,
        FieldType::Boolean,
        FieldType::Array,
    ];

    /// The snake_case name used in declarations.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Decimal => "decimal",
            FieldType::Time => "time",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FieldType::String),
            "integer" => Ok(FieldType::Integer),
            "float" => Ok(FieldType::Float),
            "decimal" => Ok(FieldType::Decimal),
            "time" => Ok(FieldType::Time),
            "date" => Ok(FieldType::Date),
            "boolean" => Ok(FieldType::Boolean),
            "array" => Ok(FieldType::Array),
            other => Err(CodecError::InvalidDataType(other.to_string())),
        }
    }
}
