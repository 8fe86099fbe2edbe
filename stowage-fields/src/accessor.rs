//! Typed per-field operations against a host record.

use stowage_codec::{StoredValue, cast, deserialize, serialize};
use tracing::{debug, warn};

use crate::{FieldResult, FieldSpec, StoreHost};

/// The old/new value pair for one field's uncommitted change.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// The value before the change, `None` when the field was unset.
    pub old: Option<StoredValue>,
    /// The pending value, `None` when the field was removed.
    pub new: Option<StoredValue>,
}

/// Typed operations for one declared field.
///
/// Borrowed out of a [`FieldSet`](crate::FieldSet); generic over the host,
/// so the same accessor drives any [`StoreHost`] implementation. Reads are
/// total: corrupt stored text degrades to an absent value inside the
/// codec. Only the write path ([`set`](Self::set)) can fail, and only on
/// an uncastable input.
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor<'a> {
    attribute: &'a str,
    spec: &'a FieldSpec,
}

impl<'a> FieldAccessor<'a> {
    pub(crate) fn new(attribute: &'a str, spec: &'a FieldSpec) -> Self {
        FieldAccessor { attribute, spec }
    }

    /// The descriptor this accessor operates on.
    #[must_use]
    pub fn spec(&self) -> &FieldSpec {
        self.spec
    }

    /// Reads the field's canonical value from the backing map.
    pub fn get<R: StoreHost>(&self, record: &R) -> Option<StoredValue> {
        let map = record.store(self.attribute)?;
        deserialize(
            self.spec.field_type(),
            map.get(self.spec.store_key()).map(String::as_str),
        )
    }

    /// True when the field holds a non-blank value.
    pub fn is_present<R: StoreHost>(&self, record: &R) -> bool {
        self.get(record).is_some_and(|value| !value.is_blank())
    }

    /// Casts `raw`, encodes it, and writes it into the backing map.
    ///
    /// The pre-mutation notification fires only when the casted value
    /// differs from the current one, so re-setting an equal value never
    /// marks the attribute dirty. The map write itself is unconditional:
    /// a full copy of the current map with this field's entry replaced.
    pub fn set<R: StoreHost>(
        &self,
        record: &mut R,
        raw: impl Into<StoredValue>,
    ) -> FieldResult<()> {
        let casted = cast(self.spec.field_type(), raw.into())?;
        let serialized = serialize(&casted);
        if self.get(record).as_ref() != Some(&casted) {
            record.store_will_change(self.attribute);
        }
        let mut map = record.store(self.attribute).unwrap_or_default();
        map.insert(self.spec.store_key().to_string(), serialized);
        record.set_store(self.attribute, map);
        debug!("set {}.{}", self.attribute, self.spec.name());
        Ok(())
    }

    /// Removes the field's entry from the backing map.
    ///
    /// Absence is the unset convention; there is no null entry. Clearing
    /// an already absent field is a no-op and does not mark the attribute
    /// dirty.
    pub fn clear<R: StoreHost>(&self, record: &mut R) {
        let mut map = record.store(self.attribute).unwrap_or_default();
        if map.contains_key(self.spec.store_key()) {
            record.store_will_change(self.attribute);
        }
        map.remove(self.spec.store_key());
        record.set_store(self.attribute, map);
        debug!("cleared {}.{}", self.attribute, self.spec.name());
    }

    /// True when this field differs across the attribute's change pair.
    ///
    /// Attribute-level dirtiness is not enough: a change to a sibling key
    /// leaves this field unchanged.
    pub fn is_changed<R: StoreHost>(&self, record: &R) -> bool {
        self.change(record).is_some()
    }

    /// The field's value before the pending change.
    ///
    /// Falls back to the current value when the attribute has no pending
    /// change, so the answer is always "what would this field be after a
    /// rollback".
    pub fn previous_value<R: StoreHost>(&self, record: &R) -> Option<StoredValue> {
        match record.store_change(self.attribute) {
            Some((old_map, _)) => deserialize(
                self.spec.field_type(),
                old_map.get(self.spec.store_key()).map(String::as_str),
            ),
            None => self.get(record),
        }
    }

    /// The field's old/new pair, `None` when the field itself is
    /// unchanged (including when only sibling keys changed).
    pub fn change<R: StoreHost>(&self, record: &R) -> Option<FieldChange> {
        let (old_map, new_map) = record.store_change(self.attribute)?;
        let key = self.spec.store_key();
        let old_raw = old_map.get(key);
        let new_raw = new_map.get(key);
        if old_raw == new_raw {
            return None;
        }
        let field_type = self.spec.field_type();
        Some(FieldChange {
            old: deserialize(field_type, old_raw.map(String::as_str)),
            new: deserialize(field_type, new_raw.map(String::as_str)),
        })
    }

    /// Rewinds the field to the old side of the attribute's change pair.
    ///
    /// The rewind is raw: the stored text from the old map is written
    /// back verbatim, without a cast/serialize pass. Sibling keys keep
    /// their current values. With no pending change there is no old side,
    /// and the field is cleared.
    pub fn restore<R: StoreHost>(&self, record: &mut R) {
        let key = self.spec.store_key();
        let old_raw = match record.store_change(self.attribute) {
            Some((old_map, _)) => old_map.get(key).cloned(),
            None => {
                warn!(
                    "restore of {}.{} without a pending change clears the field",
                    self.attribute,
                    self.spec.name()
                );
                None
            }
        };
        let mut map = record.store(self.attribute).unwrap_or_default();
        if map.get(key) != old_raw.as_ref() {
            record.store_will_change(self.attribute);
        }
        match old_raw {
            Some(text) => {
                map.insert(key.to_string(), text);
            }
            None => {
                map.remove(key);
            }
        }
        record.set_store(self.attribute, map);
        debug!("restored {}.{}", self.attribute, self.spec.name());
    }

    /// Deprecated name for [`restore`](Self::restore).
    #[deprecated(note = "use `restore` instead")]
    pub fn reset<R: StoreHost>(&self, record: &mut R) {
        self.restore(record);
    }

    /// Forces the pre-mutation notification without touching the map.
    ///
    /// For callers that mutate the backing attribute behind the accessor
    /// layer and need dirty tracking to see it coming.
    pub fn mark_changed<R: StoreHost>(&self, record: &mut R) {
        record.store_will_change(self.attribute);
    }
}
