//! Query predicate generation for stowed fields.
//!
//! Fields packed into one map column are invisible to ordinary typed
//! column predicates, so each declared field gets a family of named
//! scopes instead:
//!
//! - [`build_scopes`] / [`register_scopes`]: derive every scope for a
//!   [`FieldSet`](stowage_fields::FieldSet)
//! - [`Scope`]: one named predicate; binds caller arguments into a
//!   [`QueryFragment`] of SQL plus positional parameters
//! - [`ScopeRegistry`] / [`ScopeSet`]: where generated scopes land
//!
//! The generated SQL extracts the field's entry from the JSON-encoded
//! map and compares it under the declared type: numeric fields through a
//! `CAST`, decimals with both sides cast to `NUMERIC`, booleans against
//! their literal encodings. Arguments pass through the codec's cast, so
//! a scope accepts the same raw inputs a setter does.

mod builder;
mod scope;

pub use builder::{ScopeRegistry, ScopeSet, build_scopes, register_scopes};
pub use scope::{QueryFragment, Scope};

/// Convenience alias for query-layer results.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Errors from scope argument binding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// An argument the field's type cannot absorb.
    #[error(transparent)]
    Codec(#[from] stowage_codec::CodecError),

    /// Wrong number of arguments for the scope.
    #[error("scope {scope} takes {expected} argument(s), {given} given")]
    WrongArity {
        scope: String,
        expected: usize,
        given: usize,
    },
}
