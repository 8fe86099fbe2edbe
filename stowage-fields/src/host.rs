//! The capability a host record exposes to field accessors.

use std::collections::HashMap;

/// A backing map: store keys to string-encoded values.
///
/// Absence of a key means the field is unset. There is no null entry
/// convention; clearing a field removes its key.
pub type StoreMap = HashMap<String, String>;

/// Capability interface for a record type that carries stowed attributes.
///
/// The accessor layer depends only on this trait, never on a concrete
/// persistence framework. An implementation owns the maps and whatever
/// dirty tracking its framework provides; accessors read full copies and
/// write full replacements through it.
pub trait StoreHost {
    /// A full copy of the named backing attribute, `None` when unset.
    fn store(&self, attribute: &str) -> Option<StoreMap>;

    /// Replaces the named backing attribute wholesale.
    fn set_store(&mut self, attribute: &str, map: StoreMap);

    /// Pre-mutation notification: the named attribute is about to change.
    ///
    /// Accessors call this before writing a map that differs from the
    /// current one, and never for writes that would leave the attribute
    /// equal. Implementations typically snapshot the current value on the
    /// first call per attribute.
    fn store_will_change(&mut self, attribute: &str);

    /// The `(old, new)` map pair for the attribute's uncommitted change,
    /// or `None` when the attribute is unchanged.
    ///
    /// An unset attribute side is reported as an empty map, so callers
    /// never have to distinguish "unset" from "set but empty".
    fn store_change(&self, attribute: &str) -> Option<(StoreMap, StoreMap)>;
}
