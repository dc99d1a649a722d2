//! Slot Store Module
//!
//! Index-addressed arena of entries with a free-list for slot reuse, plus
//! the key index mapping each live key to its slot.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::entry::Entry;

// == Slot Store ==
/// Arena of entry slots. Slot indices stay stable for the life of an entry,
/// which is what the recency ring and expiration chains link through.
#[derive(Debug)]
pub(crate) struct SlotStore<K, V> {
    slots: Vec<Option<Entry<K, V>>>,
    free: Vec<usize>,
    index: HashMap<K, usize>,
}

impl<K, V> SlotStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty store, preallocating `capacity` slots when bounded.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        let capacity = capacity.unwrap_or(0);
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity),
        }
    }

    // == Find ==
    /// Resolves a key to its slot.
    pub fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    // == Insert ==
    /// Stores `entry` in a free slot (or a new one) and indexes its key.
    ///
    /// The key must not already be present.
    pub fn insert(&mut self, entry: Entry<K, V>) -> usize {
        let key = entry.key.clone();
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, slot);
        slot
    }

    // == Remove ==
    /// Frees `slot` and drops its key from the index.
    ///
    /// The caller must already have unlinked it from the ring and chains.
    pub fn remove(&mut self, slot: usize) -> Option<Entry<K, V>> {
        let entry = self.slots.get_mut(slot)?.take()?;
        self.index.remove(&entry.key);
        self.free.push(slot);
        Some(entry)
    }

    pub fn get(&self, slot: usize) -> Option<&Entry<K, V>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Number of slots ever allocated, free or not.
    #[cfg(test)]
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub fn free_slots(&self) -> &[usize] {
        &self.free
    }
}
