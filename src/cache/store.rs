//! Cache Store Module
//!
//! Main cache engine: a slot arena threaded by a recency ring for LRU
//! eviction and by expiration chains for lazy TTL expiration.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::cache::builder::TtlCacheBuilder;
use crate::cache::entry::Entry;
use crate::cache::expiry::ExpirationChains;
use crate::cache::iter::{Iter, Keys, Values};
use crate::cache::recency::RecencyRing;
use crate::cache::slots::SlotStore;
use crate::cache::{CacheStats, DisposeFn, DisposeReason, GetOptions, SetOptions};
use crate::clock::Clock;
use crate::config::CacheConfig;
use crate::error::Result;

// == TTL Cache ==
/// Bounded key-value cache with LRU eviction and lazy TTL expiration.
///
/// Expired entries are only noticed when an operation looks at them (or on
/// an explicit [`purge_stale`](TtlCache::purge_stale)); until then they keep
/// their slot and count against capacity.
pub struct TtlCache<K, V> {
    slots: SlotStore<K, V>,
    ring: RecencyRing,
    chains: ExpirationChains,
    config: CacheConfig,
    clock: Box<dyn Clock>,
    dispose: Option<Box<DisposeFn<K, V>>>,
    stats: CacheStats,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a cache with the default clock and no dispose callback.
    ///
    /// Fails if `config` is outside its declared domain.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Starts a builder for a cache with a custom clock or dispose callback.
    pub fn builder() -> TtlCacheBuilder<K, V> {
        TtlCacheBuilder::new()
    }

    /// Assembles a cache from already validated parts.
    pub(crate) fn from_parts(
        config: CacheConfig,
        clock: Box<dyn Clock>,
        dispose: Option<Box<DisposeFn<K, V>>>,
    ) -> Self {
        Self {
            slots: SlotStore::with_capacity(config.max),
            ring: RecencyRing::new(),
            chains: ExpirationChains::new(),
            config,
            clock,
            dispose,
            stats: CacheStats::new(),
        }
    }

    // == Set ==
    /// Stores a key-value pair using the cache's default policy.
    ///
    /// Overwriting a live key fires a `set` disposal for the old value and
    /// restarts its TTL, unless the config says otherwise. Writing back an
    /// equal value disposes nothing. A new key at capacity evicts the least
    /// recently used entry first.
    pub fn set(&mut self, key: K, value: V)
    where
        V: PartialEq,
    {
        self.store(key, value, SetOptions::default());
    }

    /// Stores a key-value pair with per-call overrides.
    ///
    /// Invalid options are rejected before the cache is touched.
    pub fn set_with(&mut self, key: K, value: V, opts: SetOptions) -> Result<()>
    where
        V: PartialEq,
    {
        opts.validate()?;
        self.store(key, value, opts);
        Ok(())
    }

    fn store(&mut self, key: K, value: V, opts: SetOptions)
    where
        V: PartialEq,
    {
        let now = self.clock.now();
        let ttl = opts.ttl.or(self.config.ttl).unwrap_or(0);

        if let Some(slot) = self.slots.find(&key) {
            if !self.expire_if_stale(slot, now) {
                self.overwrite(slot, key, value, ttl, now, &opts);
                return;
            }
        }
        self.allocate(key, value, ttl, now);
    }

    fn overwrite(&mut self, slot: usize, key: K, value: V, ttl: u64, now: u64, opts: &SetOptions)
    where
        V: PartialEq,
    {
        if !opts.no_update_ttl.unwrap_or(self.config.no_update_ttl) {
            self.restart(slot, now, ttl);
        }
        self.ring.touch(&mut self.slots, slot);

        let Some(entry) = self.slots.get_mut(slot) else {
            return;
        };
        let old = std::mem::replace(&mut entry.value, value);
        if old == entry.value {
            return;
        }
        self.stats.record_removal(DisposeReason::Set);
        if !opts.no_dispose_on_set.unwrap_or(self.config.no_dispose_on_set) {
            self.dispose(old, key, DisposeReason::Set);
        }
    }

    // == Allocate ==
    /// Inserts a new key at the most recently used end, evicting from the
    /// least recently used end first while at capacity.
    fn allocate(&mut self, key: K, value: V, ttl: u64, now: u64) -> usize {
        if let Some(max) = self.config.max {
            while self.slots.len() >= max {
                if !self.evict_lru() {
                    break;
                }
            }
        }

        let entry = Entry::new(key, value, now, ttl);
        let deadline = entry.deadline();
        let slot = self.slots.insert(entry);
        self.ring.push_back(&mut self.slots, slot);
        if let Some(expires_at) = deadline {
            self.chains.file(&mut self.slots, slot, expires_at);
        }
        slot
    }

    // == Get ==
    /// Retrieves a value by key using the cache's default read policy.
    ///
    /// A stale entry is disposed with reason `stale` and reported as absent.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup(key, GetOptions::default())
    }

    /// Retrieves a value by key with per-call read overrides.
    pub fn get_with<Q>(&mut self, key: &Q, opts: GetOptions) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        opts.validate()?;
        Ok(self.lookup(key, opts))
    }

    fn lookup<Q>(&mut self, key: &Q, opts: GetOptions) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let Some(slot) = self.live_slot(key, now) else {
            self.stats.record_miss();
            return None;
        };

        if opts.update_age_on_get.unwrap_or(self.config.update_age_on_get) {
            self.ring.touch(&mut self.slots, slot);
            let ttl = opts
                .ttl
                .or_else(|| self.slots.get(slot).map(|entry| entry.ttl))
                .unwrap_or(0);
            self.restart(slot, now, ttl);
        }

        self.stats.record_hit();
        self.slots.get(slot).map(|entry| &entry.value)
    }

    // == Has ==
    /// Returns whether a live entry exists for `key`.
    ///
    /// Discovering a stale entry disposes it, but recency and TTL of a live
    /// entry are never changed.
    pub fn has<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.live_slot(key, now).is_some()
    }

    // == Delete ==
    /// Removes an entry by key, firing a `delete` disposal.
    ///
    /// Returns whether anything was removed.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(entry) = self.slots.find(key).and_then(|slot| self.release(slot)) else {
            return false;
        };
        self.stats.record_removal(DisposeReason::Delete);
        self.dispose(entry.value, entry.key, DisposeReason::Delete);
        true
    }

    // == Remaining TTL ==
    /// Returns the time left before `key` expires.
    ///
    /// # Returns
    /// - `Some(remaining)` for a live entry with a TTL
    /// - `Some(0)` for an absent or stale entry
    /// - `None` for a live entry that never expires
    pub fn remaining_ttl<Q>(&mut self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        match self.live_slot(key, now) {
            Some(slot) => self.slots.get(slot).and_then(|entry| entry.remaining(now)),
            None => Some(0),
        }
    }

    // == Clear ==
    /// Removes every entry from least to most recently used, firing a
    /// `delete` disposal for each.
    pub fn clear(&mut self) {
        let mut cleared = 0usize;
        while let Some(slot) = self.ring.lru() {
            let Some(entry) = self.release(slot) else {
                break;
            };
            cleared += 1;
            self.stats.record_removal(DisposeReason::Delete);
            self.dispose(entry.value, entry.key, DisposeReason::Delete);
        }
        debug!(cleared, "cache cleared");
    }

    // == Purge Stale ==
    /// Releases every entry whose TTL has elapsed, earliest expiration first.
    ///
    /// Nothing calls this on a schedule; it only runs when asked. Returns
    /// the number of entries removed.
    pub fn purge_stale(&mut self) -> usize {
        let now = self.clock.now();
        let stale = self.chains.stale_slots(&self.slots, now);
        let mut purged = 0usize;
        for slot in stale {
            if let Some(entry) = self.release(slot) {
                purged += 1;
                self.stats.record_removal(DisposeReason::Stale);
                self.dispose(entry.value, entry.key, DisposeReason::Stale);
            }
        }
        if purged > 0 {
            debug!(purged, "purged stale entries");
        }
        purged
    }

    // == Length ==
    /// Returns the number of occupied slots, stale ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    // == Is Empty ==
    /// Returns true when no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.len() == 0
    }

    /// Maximum number of entries, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.config.max
    }

    /// The policy this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.slots.len();
        stats
    }

    // == Iteration ==
    /// Iterates `(key, value)` pairs from least to most recently used.
    ///
    /// Iteration is read-only: it neither refreshes recency nor drops
    /// stale entries. Use `.rev()` for most-recent-first order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.slots, self.ring.lru(), self.slots.len())
    }

    /// Keys in the same order as [`iter`](TtlCache::iter).
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Values in the same order as [`iter`](TtlCache::iter).
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    // == Internals ==

    /// Resolves `key` to a live slot, disposing it first if it is stale.
    fn live_slot<Q>(&mut self, key: &Q, now: u64) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.slots.find(key)?;
        if self.expire_if_stale(slot, now) {
            None
        } else {
            Some(slot)
        }
    }

    fn expire_if_stale(&mut self, slot: usize, now: u64) -> bool {
        let stale = self.slots.get(slot).is_some_and(|entry| entry.is_stale(now));
        if stale {
            if let Some(entry) = self.release(slot) {
                self.stats.record_removal(DisposeReason::Stale);
                trace!(slot, now, "entry found stale");
                self.dispose(entry.value, entry.key, DisposeReason::Stale);
            }
        }
        stale
    }

    /// Restarts a slot's TTL window at `now` and refiles it.
    fn restart(&mut self, slot: usize, now: u64, ttl: u64) {
        let deadline = self.slots.get_mut(slot).and_then(|entry| {
            entry.start = now;
            entry.ttl = ttl;
            entry.deadline()
        });
        self.chains.refile(&mut self.slots, slot, deadline);
    }

    fn evict_lru(&mut self) -> bool {
        let Some(entry) = self.ring.lru().and_then(|slot| self.release(slot)) else {
            return false;
        };
        self.stats.record_removal(DisposeReason::Evict);
        debug!("evicted least recently used entry");
        self.dispose(entry.value, entry.key, DisposeReason::Evict);
        true
    }

    /// Unlinks a slot from the ring and its chain and frees it. Never
    /// disposes; callers pick the reason.
    fn release(&mut self, slot: usize) -> Option<Entry<K, V>> {
        self.ring.unlink(&mut self.slots, slot);
        self.chains.unfile(&mut self.slots, slot);
        self.slots.remove(slot)
    }

    fn dispose(&mut self, value: V, key: K, reason: DisposeReason) {
        trace!(%reason, "disposing entry");
        if let Some(dispose) = self.dispose.as_mut() {
            dispose(value, key, reason);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("len", &self.slots.len())
            .field("expiration_chains", &self.chains.len())
            .field("config", &self.config)
            .field("has_dispose", &self.dispose.is_some())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Panics if the slot store, key index, ring and chains disagree.
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        let len = self.slots.len();
        if let Some(max) = self.config.max {
            assert!(len <= max, "len {} exceeds max {}", len, max);
        }

        let mut seen = HashSet::new();
        let mut filed = 0usize;
        if let Some(head) = self.ring.lru() {
            let mut cursor = head;
            loop {
                assert!(seen.insert(cursor), "slot {} appears twice in ring", cursor);
                let entry = self.slots.get(cursor).expect("ring references a free slot");
                assert_eq!(self.slots.find(&entry.key), Some(cursor), "key index mismatch");
                let next = self.slots.get(entry.next).expect("dangling next link");
                assert_eq!(next.prev, cursor, "broken prev link");

                assert_eq!(entry.expires_at, entry.deadline(), "filed under wrong instant");
                if let Some(expires_at) = entry.expires_at {
                    filed += 1;
                    assert!(
                        self.chains.members(&self.slots, expires_at).contains(&cursor),
                        "slot {} missing from its chain",
                        cursor
                    );
                }

                cursor = entry.next;
                if cursor == head {
                    break;
                }
            }
        }
        assert_eq!(seen.len(), len, "ring does not cover every occupied slot");

        let mut chained = 0usize;
        for instant in self.chains.instants() {
            let members = self.chains.members(&self.slots, instant);
            assert!(!members.is_empty(), "empty chain left behind");
            assert_eq!(self.chains.tail_of(instant), members.last().copied());
            chained += members.len();
        }
        assert_eq!(chained, filed, "chain membership count mismatch");
        assert!(self.slots.free_slots().iter().all(|slot| !seen.contains(slot)));
    }

    pub(crate) fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub(crate) fn allocated_slots(&self) -> usize {
        self.slots.allocated()
    }
}
