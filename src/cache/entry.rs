//! Cache Entry Module
//!
//! Defines the payload held by each occupied slot, including the links that
//! thread it through the recency ring and its expiration chain.

// == Cache Entry ==
/// A single cache entry with its TTL bookkeeping and list links.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub key: K,
    pub value: V,
    /// Clock reading when the current TTL window started
    pub start: u64,
    /// TTL window length, 0 = never expires
    pub ttl: u64,
    /// Expiration chain the entry is filed under
    pub expires_at: Option<u64>,
    /// Recency ring neighbours (circular, so always valid while occupied)
    pub prev: usize,
    pub next: usize,
    /// Neighbours inside the expiration chain
    pub exp_prev: Option<usize>,
    pub exp_next: Option<usize>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry. The caller files it into the ring and,
    /// if `ttl > 0`, into an expiration chain.
    pub fn new(key: K, value: V, start: u64, ttl: u64) -> Self {
        Self {
            key,
            value,
            start,
            ttl,
            expires_at: None,
            prev: 0,
            next: 0,
            exp_prev: None,
            exp_next: None,
        }
    }

    /// The instant this entry's current window ends, if it has one.
    pub fn deadline(&self) -> Option<u64> {
        (self.ttl > 0).then(|| self.start.saturating_add(self.ttl))
    }

    // == Is Stale ==
    /// Boundary condition: an entry is stale once `now >= expires_at`.
    pub fn is_stale(&self, now: u64) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(0)` if the window has elapsed
    /// - `Some(remaining)` while the window is open
    /// - `None` if the entry has no TTL
    pub fn remaining(&self, now: u64) -> Option<u64> {
        self.expires_at.map(|expires| expires.saturating_sub(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_without_ttl_never_stale() {
        let entry = Entry::new("k", "v", 10, 0);
        assert_eq!(entry.deadline(), None);
        assert!(!entry.is_stale(u64::MAX));
        assert_eq!(entry.remaining(100), None);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let mut entry = Entry::new("k", "v", 10, 5);
        entry.expires_at = entry.deadline();

        assert_eq!(entry.expires_at, Some(15));
        assert!(!entry.is_stale(14));
        assert!(entry.is_stale(15), "Entry should be stale at boundary");
        assert_eq!(entry.remaining(12), Some(3));
        assert_eq!(entry.remaining(20), Some(0));
    }

    #[test]
    fn test_deadline_saturates() {
        let entry = Entry::new("k", "v", u64::MAX - 1, 10);
        assert_eq!(entry.deadline(), Some(u64::MAX));
    }
}
