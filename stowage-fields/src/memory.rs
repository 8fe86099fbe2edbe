//! In-memory reference host with snapshot-based dirty tracking.

use std::collections::HashMap;

use crate::{StoreHost, StoreMap};

/// An in-memory record carrying stowed attributes.
///
/// Dirty tracking follows the usual ORM contract: the first
/// `store_will_change` per attribute snapshots its current value,
/// `store_change` reports the snapshot/current pair while they differ,
/// and [`commit`](Self::commit) discards all snapshots the way a
/// successful save would.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecord {
    attributes: HashMap<String, StoreMap>,
    snapshots: HashMap<String, StoreMap>,
}

impl MemoryRecord {
    /// An empty record with no attributes set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the current state as saved, clearing every change pair.
    pub fn commit(&mut self) {
        self.snapshots.clear();
    }

    /// True when any attribute has an uncommitted change.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.snapshots.iter().any(|(attribute, snapshot)| {
            let current = self.attributes.get(attribute);
            match current {
                Some(map) => map != snapshot,
                None => !snapshot.is_empty(),
            }
        })
    }
}

impl StoreHost for MemoryRecord {
    fn store(&self, attribute: &str) -> Option<StoreMap> {
        self.attributes.get(attribute).cloned()
    }

    fn set_store(&mut self, attribute: &str, map: StoreMap) {
        self.attributes.insert(attribute.to_string(), map);
    }

    fn store_will_change(&mut self, attribute: &str) {
        // Only the first notification per attribute snapshots; later ones
        // must not overwrite the pre-change state.
        if !self.snapshots.contains_key(attribute) {
            let current = self.attributes.get(attribute).cloned().unwrap_or_default();
            self.snapshots.insert(attribute.to_string(), current);
        }
    }

    fn store_change(&self, attribute: &str) -> Option<(StoreMap, StoreMap)> {
        let snapshot = self.snapshots.get(attribute)?;
        let current = self.attributes.get(attribute).cloned().unwrap_or_default();
        if *snapshot == current {
            return None;
        }
        Some((snapshot.clone(), current))
    }
}
