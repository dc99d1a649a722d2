//! Recency Ring Module
//!
//! Circular doubly-linked list over slot indices used for LRU eviction.
//!
//! - `head` = least recently used
//! - `head.prev` = most recently used

use std::hash::Hash;

use crate::cache::slots::SlotStore;

// == Recency Ring ==
/// Access order of occupied slots. The links live in the entries
/// themselves; the ring only remembers where it starts.
#[derive(Debug, Default)]
pub(crate) struct RecencyRing {
    head: Option<usize>,
}

impl RecencyRing {
    pub fn new() -> Self {
        Self { head: None }
    }

    // == LRU ==
    /// The least recently used slot, the next eviction candidate.
    pub fn lru(&self) -> Option<usize> {
        self.head
    }

    // == MRU ==
    pub fn mru<K, V>(&self, slots: &SlotStore<K, V>) -> Option<usize>
    where
        K: Hash + Eq + Clone,
    {
        self.head
            .and_then(|head| slots.get(head))
            .map(|entry| entry.prev)
    }

    // == Push Back ==
    /// Links an unlinked slot in at the most recently used end.
    pub fn push_back<K, V>(&mut self, slots: &mut SlotStore<K, V>, slot: usize)
    where
        K: Hash + Eq + Clone,
    {
        let Some(head) = self.head else {
            if let Some(entry) = slots.get_mut(slot) {
                entry.prev = slot;
                entry.next = slot;
                self.head = Some(slot);
            }
            return;
        };

        let Some(tail) = slots.get(head).map(|entry| entry.prev) else {
            return;
        };
        if let Some(entry) = slots.get_mut(slot) {
            entry.prev = tail;
            entry.next = head;
        }
        if let Some(entry) = slots.get_mut(tail) {
            entry.next = slot;
        }
        if let Some(entry) = slots.get_mut(head) {
            entry.prev = slot;
        }
    }

    // == Unlink ==
    /// Detaches a slot from the ring.
    pub fn unlink<K, V>(&mut self, slots: &mut SlotStore<K, V>, slot: usize)
    where
        K: Hash + Eq + Clone,
    {
        let Some((prev, next)) = slots.get(slot).map(|entry| (entry.prev, entry.next)) else {
            return;
        };

        if next == slot {
            // Only member.
            self.head = None;
            return;
        }

        if let Some(entry) = slots.get_mut(prev) {
            entry.next = next;
        }
        if let Some(entry) = slots.get_mut(next) {
            entry.prev = prev;
        }
        if self.head == Some(slot) {
            self.head = Some(next);
        }
    }

    // == Touch ==
    /// Marks a slot as most recently used.
    pub fn touch<K, V>(&mut self, slots: &mut SlotStore<K, V>, slot: usize)
    where
        K: Hash + Eq + Clone,
    {
        if self.mru(slots) == Some(slot) {
            return;
        }
        if self.head == Some(slot) {
            // Rotating the ring by one makes the head the tail.
            self.head = slots.get(slot).map(|entry| entry.next);
            return;
        }
        self.unlink(slots, slot);
        self.push_back(slots, slot);
    }
}
