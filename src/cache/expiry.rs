//! Expiration Chains Module
//!
//! Groups entries by their exact expiration instant. Every instant maps to
//! one doubly-linked chain of slot indices, so entries written together
//! with the same TTL share a single chain.

use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::slots::SlotStore;

/// Ends of one expiration chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Chain {
    head: usize,
    tail: usize,
}

// == Expiration Chains ==
#[derive(Debug, Default)]
pub(crate) struct ExpirationChains {
    chains: HashMap<u64, Chain>,
}

impl ExpirationChains {
    pub fn new() -> Self {
        Self {
            chains: HashMap::new(),
        }
    }

    /// Number of distinct expiration instants currently tracked.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    // == File ==
    /// Appends an unfiled slot to the chain for `expires_at`.
    pub fn file<K, V>(&mut self, slots: &mut SlotStore<K, V>, slot: usize, expires_at: u64)
    where
        K: Hash + Eq + Clone,
    {
        let previous_tail = match self.chains.get_mut(&expires_at) {
            Some(chain) => {
                let tail = chain.tail;
                chain.tail = slot;
                Some(tail)
            }
            None => {
                self.chains.insert(
                    expires_at,
                    Chain {
                        head: slot,
                        tail: slot,
                    },
                );
                None
            }
        };

        if let Some(tail) = previous_tail {
            if let Some(entry) = slots.get_mut(tail) {
                entry.exp_next = Some(slot);
            }
        }
        if let Some(entry) = slots.get_mut(slot) {
            entry.expires_at = Some(expires_at);
            entry.exp_prev = previous_tail;
            entry.exp_next = None;
        }
    }

    // == Unfile ==
    /// Removes a slot from its chain, dropping the chain once it is empty.
    /// Slots without an expiration are left alone.
    pub fn unfile<K, V>(&mut self, slots: &mut SlotStore<K, V>, slot: usize)
    where
        K: Hash + Eq + Clone,
    {
        let Some((expires_at, prev, next)) = slots.get_mut(slot).and_then(|entry| {
            let expires_at = entry.expires_at.take()?;
            Some((expires_at, entry.exp_prev.take(), entry.exp_next.take()))
        }) else {
            return;
        };

        match prev {
            Some(prev) => {
                if let Some(entry) = slots.get_mut(prev) {
                    entry.exp_next = next;
                }
            }
            None => {
                if let Some(chain) = self.chains.get_mut(&expires_at) {
                    match next {
                        Some(next) => chain.head = next,
                        None => {
                            self.chains.remove(&expires_at);
                        }
                    }
                }
            }
        }

        match next {
            Some(next) => {
                if let Some(entry) = slots.get_mut(next) {
                    entry.exp_prev = prev;
                }
            }
            None => {
                if let (Some(prev), Some(chain)) = (prev, self.chains.get_mut(&expires_at)) {
                    chain.tail = prev;
                }
            }
        }
    }

    // == Refile ==
    /// Moves a slot to the chain for `expires_at`, or out of every chain
    /// when `expires_at` is `None`.
    pub fn refile<K, V>(&mut self, slots: &mut SlotStore<K, V>, slot: usize, expires_at: Option<u64>)
    where
        K: Hash + Eq + Clone,
    {
        self.unfile(slots, slot);
        if let Some(expires_at) = expires_at {
            self.file(slots, slot, expires_at);
        }
    }

    // == Stale Slots ==
    /// Lists every slot whose chain instant is `<= now`, earliest instant
    /// first and chain order within an instant.
    pub fn stale_slots<K, V>(&self, slots: &SlotStore<K, V>, now: u64) -> Vec<usize>
    where
        K: Hash + Eq + Clone,
    {
        let mut instants: Vec<(u64, usize)> = self
            .chains
            .iter()
            .filter(|(expires_at, _)| **expires_at <= now)
            .map(|(expires_at, chain)| (*expires_at, chain.head))
            .collect();
        instants.sort_unstable();

        let mut stale = Vec::new();
        for (_, head) in instants {
            let mut cursor = Some(head);
            while let Some(slot) = cursor {
                stale.push(slot);
                cursor = slots.get(slot).and_then(|entry| entry.exp_next);
            }
        }
        stale
    }

    /// Walks one chain head to tail.
    #[cfg(test)]
    pub fn members<K, V>(&self, slots: &SlotStore<K, V>, expires_at: u64) -> Vec<usize>
    where
        K: Hash + Eq + Clone,
    {
        let mut out = Vec::new();
        let mut cursor = self.chains.get(&expires_at).map(|chain| chain.head);
        while let Some(slot) = cursor {
            out.push(slot);
            cursor = slots.get(slot).and_then(|entry| entry.exp_next);
        }
        out
    }

    #[cfg(test)]
    pub fn instants(&self) -> Vec<u64> {
        let mut instants: Vec<u64> = self.chains.keys().copied().collect();
        instants.sort_unstable();
        instants
    }

    #[cfg(test)]
    pub fn tail_of(&self, expires_at: u64) -> Option<usize> {
        self.chains.get(&expires_at).map(|chain| chain.tail)
    }
}
