//! Disposal Module
//!
//! Reasons an entry can leave the cache and the callback type notified of it.

use std::fmt;

use serde::Serialize;

// == Dispose Reason ==
/// Describes why an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisposeReason {
    /// The value was overwritten by a new `set` on the same key.
    Set,
    /// The entry was removed to stay within capacity.
    Evict,
    /// The entry's TTL had elapsed when it was next looked at.
    Stale,
    /// The entry was removed by `delete` or `clear`.
    Delete,
}

impl DisposeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisposeReason::Set => "set",
            DisposeReason::Evict => "evict",
            DisposeReason::Stale => "stale",
            DisposeReason::Delete => "delete",
        }
    }
}

impl fmt::Display for DisposeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback receiving `(value, key, reason)` for every entry leaving the cache.
///
/// It runs synchronously after the cache has finished updating itself. A
/// panic inside it unwinds through the operation that triggered it.
pub type DisposeFn<K, V> = dyn FnMut(V, K, DisposeReason) + Send;
