//! Field declarations and typed accessors over a stowed map.
//!
//! A record keeps a whole group of typed fields inside one string-to-string
//! map attribute instead of one column per field. This crate is the layer
//! between the codec and a host record:
//!
//! - [`FieldSet`]: a validated, immutable set of field declarations
//! - [`FieldAccessor`]: typed read/write/change-tracking operations for
//!   one declared field
//! - [`StoreHost`]: the capability a host record implements to expose its
//!   backing map and dirty tracking
//! - [`MemoryRecord`]: an in-memory host with snapshot-based dirty
//!   tracking, used as the reference implementation and in tests
//!
//! Accessors never mutate host state in place: they read a copy of the
//! map, derive the successor map, and hand it back through the host. All
//! change tracking stays attribute-level on the host side; the field-level
//! view (`is_changed`, `previous_value`, `change`, `restore`) is derived
//! from the host's single change pair.

mod accessor;
mod host;
mod memory;
mod spec;

pub use accessor::{FieldAccessor, FieldChange};
pub use host::{StoreHost, StoreMap};
pub use memory::MemoryRecord;
pub use spec::{FieldDecl, FieldSet, FieldSpec};

/// Convenience alias for field-layer results.
pub type FieldResult<T> = std::result::Result<T, FieldError>;

/// Errors from field declaration and accessor operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// An invalid type name or uncastable value, straight from the codec.
    #[error(transparent)]
    Codec(#[from] stowage_codec::CodecError),

    /// A field name that is not part of the declaration set.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A declaration the registry refuses to accept.
    #[error("invalid field declaration: {0}")]
    InvalidDeclaration(String),
}
