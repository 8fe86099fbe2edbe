//! Cast, serialize, and deserialize dispatch for every field type.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tracing::warn;

use crate::{CodecError, CodecResult, FieldType, StoredValue, decimal};

/// Coerces raw input into the canonical variant for `field_type`.
///
/// This is the single fallible step of the codec: inputs the target type
/// cannot absorb fail with [`CodecError::InvalidValue`]. Everything
/// downstream (serialization, change detection, query parameter binding)
/// operates on the canonical value this returns.
pub fn cast(field_type: FieldType, raw: StoredValue) -> CodecResult<StoredValue> {
    match field_type {
        FieldType::String => Ok(StoredValue::Text(display_form(&raw))),
        FieldType::Integer => cast_integer(raw),
        FieldType::Float => cast_float(raw),
        FieldType::Decimal => cast_decimal(raw),
        FieldType::Time => cast_time(raw),
        FieldType::Date => cast_date(raw),
        FieldType::Boolean => cast_boolean(raw),
        FieldType::Array => cast_array(raw),
    }
}

/// Encodes a canonical value as stored text.
///
/// Total for canonical values: integers and epoch seconds in decimal
/// digits, dates in ISO 8601, booleans as `true` / `false`, arrays as a
/// JSON array of encoding-stable elements.
#[must_use]
pub fn serialize(value: &StoredValue) -> String {
    match value {
        StoredValue::Text(text) => text.clone(),
        StoredValue::Integer(n) => n.to_string(),
        StoredValue::Float(f) => format!("{f}"),
        StoredValue::Decimal(text) => text.clone(),
        StoredValue::Time(t) => t.timestamp().to_string(),
        StoredValue::Date(d) => d.to_string(),
        StoredValue::Boolean(b) => b.to_string(),
        StoredValue::Array(items) => encode_array(items),
    }
}

/// Decodes stored text back into the canonical value for `field_type`.
///
/// Total by design: `None` comes back both for an absent entry and for
/// stored text that does not parse under its declared type. The latter
/// also logs a warning, so a corrupt entry degrades a single field
/// instead of failing every read of the record.
pub fn deserialize(field_type: FieldType, raw: Option<&str>) -> Option<StoredValue> {
    let raw = raw?;
    let parsed = match field_type {
        FieldType::String => Some(StoredValue::Text(raw.to_string())),
        FieldType::Integer => raw.trim().parse::<i64>().ok().map(StoredValue::Integer),
        FieldType::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(StoredValue::Float),
        FieldType::Decimal => decimal::normalize(raw).map(StoredValue::Decimal),
        FieldType::Time => raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(StoredValue::Time),
        FieldType::Date => raw.trim().parse::<NaiveDate>().ok().map(StoredValue::Date),
        FieldType::Boolean => Some(StoredValue::Boolean(truthy_text(raw))),
        FieldType::Array => decode_array(raw),
    };
    if parsed.is_none() {
        warn!("stored text {raw:?} does not parse as {field_type}; reading as absent");
    }
    parsed
}

fn invalid_value(target: FieldType, raw: &StoredValue) -> CodecError {
    CodecError::InvalidValue {
        target,
        value: format!("{raw:?}"),
    }
}

/// The display rendering used by the string cast.
fn display_form(value: &StoredValue) -> String {
    match value {
        StoredValue::Text(text) => text.clone(),
        StoredValue::Integer(n) => n.to_string(),
        StoredValue::Float(f) => format!("{f}"),
        StoredValue::Decimal(text) => text.clone(),
        StoredValue::Time(t) => t.to_rfc3339(),
        StoredValue::Date(d) => d.to_string(),
        StoredValue::Boolean(b) => b.to_string(),
        StoredValue::Array(items) => encode_array(items),
    }
}

fn cast_integer(raw: StoredValue) -> CodecResult<StoredValue> {
    match raw {
        StoredValue::Integer(_) => Ok(raw),
        StoredValue::Float(f) => float_to_integer(f)
            .map(StoredValue::Integer)
            .ok_or_else(|| invalid_value(FieldType::Integer, &StoredValue::Float(f))),
        StoredValue::Text(ref text) => {
            let trimmed = text.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                Ok(StoredValue::Integer(n))
            } else if let Some(n) = trimmed.parse::<f64>().ok().and_then(float_to_integer) {
                // Fractional text truncates toward zero, like the float cast.
                Ok(StoredValue::Integer(n))
            } else {
                Err(invalid_value(FieldType::Integer, &raw))
            }
        }
        StoredValue::Decimal(ref text) => text
            .parse::<i64>()
            .ok()
            .or_else(|| text.parse::<f64>().ok().and_then(float_to_integer))
            .map(StoredValue::Integer)
            .ok_or_else(|| invalid_value(FieldType::Integer, &raw)),
        _ => Err(invalid_value(FieldType::Integer, &raw)),
    }
}

fn float_to_integer(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let truncated = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is out of range.
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

fn cast_float(raw: StoredValue) -> CodecResult<StoredValue> {
    match raw {
        StoredValue::Float(f) if f.is_finite() => Ok(raw),
        StoredValue::Integer(n) => Ok(StoredValue::Float(n as f64)),
        StoredValue::Text(ref text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(StoredValue::Float)
            .ok_or_else(|| invalid_value(FieldType::Float, &raw)),
        StoredValue::Decimal(ref text) => text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(StoredValue::Float)
            .ok_or_else(|| invalid_value(FieldType::Float, &raw)),
        _ => Err(invalid_value(FieldType::Float, &raw)),
    }
}

fn cast_decimal(raw: StoredValue) -> CodecResult<StoredValue> {
    match raw {
        StoredValue::Decimal(_) => Ok(raw),
        StoredValue::Integer(n) => Ok(StoredValue::Decimal(n.to_string())),
        StoredValue::Float(f) if f.is_finite() => decimal::normalize(&format!("{f}"))
            .map(StoredValue::Decimal)
            .ok_or_else(|| invalid_value(FieldType::Decimal, &StoredValue::Float(f))),
        StoredValue::Text(ref text) => decimal::normalize(text)
            .map(StoredValue::Decimal)
            .ok_or_else(|| invalid_value(FieldType::Decimal, &raw)),
        _ => Err(invalid_value(FieldType::Decimal, &raw)),
    }
}

fn cast_time(raw: StoredValue) -> CodecResult<StoredValue> {
    match raw {
        StoredValue::Time(t) => whole_seconds(t)
            .ok_or_else(|| invalid_value(FieldType::Time, &StoredValue::Time(t))),
        StoredValue::Integer(secs) => DateTime::from_timestamp(secs, 0)
            .map(StoredValue::Time)
            .ok_or_else(|| invalid_value(FieldType::Time, &StoredValue::Integer(secs))),
        StoredValue::Text(ref text) => {
            let trimmed = text.trim();
            if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
                whole_seconds(parsed.with_timezone(&Utc))
                    .ok_or_else(|| invalid_value(FieldType::Time, &raw))
            } else if let Ok(secs) = trimmed.parse::<i64>() {
                DateTime::from_timestamp(secs, 0)
                    .map(StoredValue::Time)
                    .ok_or_else(|| invalid_value(FieldType::Time, &raw))
            } else {
                Err(invalid_value(FieldType::Time, &raw))
            }
        }
        _ => Err(invalid_value(FieldType::Time, &raw)),
    }
}

/// Truncates to whole-second precision, the granularity of the stored
/// epoch encoding.
fn whole_seconds(t: DateTime<Utc>) -> Option<StoredValue> {
    DateTime::from_timestamp(t.timestamp(), 0).map(StoredValue::Time)
}

fn cast_date(raw: StoredValue) -> CodecResult<StoredValue> {
    match raw {
        StoredValue::Date(_) => Ok(raw),
        StoredValue::Time(t) => Ok(StoredValue::Date(t.date_naive())),
        StoredValue::Text(ref text) => text
            .trim()
            .parse::<NaiveDate>()
            .map(StoredValue::Date)
            .map_err(|_| invalid_value(FieldType::Date, &raw)),
        _ => Err(invalid_value(FieldType::Date, &raw)),
    }
}

fn cast_boolean(raw: StoredValue) -> CodecResult<StoredValue> {
    match raw {
        StoredValue::Boolean(_) => Ok(raw),
        StoredValue::Integer(n) => Ok(StoredValue::Boolean(n != 0)),
        StoredValue::Float(f) => Ok(StoredValue::Boolean(f != 0.0)),
        StoredValue::Decimal(ref text) => Ok(StoredValue::Boolean(text != "0")),
        StoredValue::Text(ref text) => Ok(StoredValue::Boolean(truthy_text(text))),
        _ => Err(invalid_value(FieldType::Boolean, &raw)),
    }
}

/// The truthiness rule shared by the boolean cast and deserializer.
fn truthy_text(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "t" | "1" | "on" | "yes"
    )
}

fn cast_array(raw: StoredValue) -> CodecResult<StoredValue> {
    match raw {
        StoredValue::Array(items) => Ok(StoredValue::Array(canonical_elements(items)?)),
        scalar => Ok(StoredValue::Array(vec![canonical_element(scalar)?])),
    }
}

fn canonical_elements(items: Vec<StoredValue>) -> CodecResult<Vec<StoredValue>> {
    items.into_iter().map(canonical_element).collect()
}

/// Rewrites an array element into an encoding-stable variant, so the JSON
/// encoding round-trips to an equal canonical array.
fn canonical_element(value: StoredValue) -> CodecResult<StoredValue> {
    match value {
        StoredValue::Float(f) if !f.is_finite() => {
            Err(invalid_value(FieldType::Array, &StoredValue::Float(f)))
        }
        StoredValue::Decimal(text) => Ok(StoredValue::Text(text)),
        StoredValue::Time(t) => Ok(StoredValue::Integer(t.timestamp())),
        StoredValue::Date(d) => Ok(StoredValue::Text(d.to_string())),
        StoredValue::Array(items) => Ok(StoredValue::Array(canonical_elements(items)?)),
        other => Ok(other),
    }
}

fn encode_array(items: &[StoredValue]) -> String {
    Value::Array(items.iter().map(element_to_json).collect()).to_string()
}

fn element_to_json(value: &StoredValue) -> Value {
    match value {
        StoredValue::Text(text) => Value::String(text.clone()),
        StoredValue::Integer(n) => Value::Number((*n).into()),
        // Canonical arrays only hold finite floats; the fallback keeps
        // this total for hand-built values.
        StoredValue::Float(f) => serde_json::Number::from_f64(*f)
            .map_or_else(|| Value::String(format!("{f}")), Value::Number),
        StoredValue::Decimal(text) => Value::String(text.clone()),
        StoredValue::Time(t) => Value::Number(t.timestamp().into()),
        StoredValue::Date(d) => Value::String(d.to_string()),
        StoredValue::Boolean(b) => Value::Bool(*b),
        StoredValue::Array(items) => Value::Array(items.iter().map(element_to_json).collect()),
    }
}

fn decode_array(raw: &str) -> Option<StoredValue> {
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Array(items) => items
            .iter()
            .map(json_to_element)
            .collect::<Option<Vec<_>>>()
            .map(StoredValue::Array),
        _ => None,
    }
}

fn json_to_element(value: &Value) -> Option<StoredValue> {
    match value {
        Value::String(text) => Some(StoredValue::Text(text.clone())),
        Value::Bool(b) => Some(StoredValue::Boolean(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(StoredValue::Integer)
            .or_else(|| n.as_f64().map(StoredValue::Float)),
        Value::Array(items) => items
            .iter()
            .map(json_to_element)
            .collect::<Option<Vec<_>>>()
            .map(StoredValue::Array),
        Value::Null | Value::Object(_) => None,
    }
}
