//! Typed value codec for stowed fields.
//!
//! A stowed field lives inside a single string-to-string map column rather
//! than in a column of its own. This crate owns the type layer over that
//! map:
//!
//! - [`FieldType`]: the closed set of declarable field types
//! - [`StoredValue`]: the canonical in-memory value, one variant per type
//! - [`cast`]: coerce raw input into the canonical variant for a type
//! - [`serialize`]: encode a canonical value as stored text
//! - [`deserialize`]: decode stored text back into a canonical value
//!
//! Writes go through `cast` then `serialize`; reads go through
//! `deserialize`. Casting is the only fallible step. Deserialization is
//! total: stored text that does not parse under its declared type is
//! reported as absent (with a warning) instead of failing the read, so a
//! single corrupt entry cannot poison every read of the record.
//!
//! For any canonical value produced by `cast`, deserializing its
//! serialized form yields the value back unchanged.

mod codec;
mod decimal;
mod field_type;
mod value;

pub use codec::{cast, deserialize, serialize};
pub use field_type::FieldType;
pub use value::StoredValue;

/// Convenience alias for codec results.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors produced while declaring types or casting values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A declared type name outside the supported set.
    #[error("invalid data type: {0}")]
    InvalidDataType(String),

    /// Raw input that cannot be coerced to the declared type.
    #[error("cannot cast {value} to {target}")]
    InvalidValue {
        /// The type the cast was asked to produce.
        target: FieldType,
        /// Debug rendering of the rejected input.
        value: String,
    },
}
