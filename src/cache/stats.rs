//! Cache Statistics Module
//!
//! Read outcomes plus a count of entries leaving the cache, split by the
//! [`DisposeReason`] they left with.

use serde::Serialize;

use crate::cache::DisposeReason;

// == Cache Stats ==
/// Counters describing cache activity since construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that found nothing, absent and stale alike
    pub misses: u64,
    /// Live values replaced by a `set`
    pub overwrites: u64,
    /// Entries evicted to stay within capacity
    pub evictions: u64,
    /// Stale entries released, lazily or by `purge_stale`
    pub expirations: u64,
    /// Entries removed by `delete` or `clear`
    pub deletions: u64,
    /// Occupied slots when the snapshot was taken, stale ones included
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of reads counted.
    pub fn reads(&self) -> u64 {
        self.hits + self.misses
    }

    // == Hit Rate ==
    /// Fraction of reads that were hits, `0.0` before the first read.
    pub fn hit_rate(&self) -> f64 {
        match self.reads() {
            0 => 0.0,
            reads => self.hits as f64 / reads as f64,
        }
    }

    /// Number of entries or values that left the cache for any reason.
    pub fn removals(&self) -> u64 {
        self.overwrites + self.evictions + self.expirations + self.deletions
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_removal(&mut self, reason: DisposeReason) {
        let counter = match reason {
            DisposeReason::Set => &mut self.overwrites,
            DisposeReason::Evict => &mut self.evictions,
            DisposeReason::Stale => &mut self.expirations,
            DisposeReason::Delete => &mut self.deletions,
        };
        *counter += 1;
    }
}
