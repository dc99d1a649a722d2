//! Cache Module
//!
//! Provides an in-memory cache with LRU eviction and lazy TTL expiration.

mod builder;
mod dispose;
mod entry;
mod expiry;
mod iter;
mod options;
mod recency;
mod slots;
mod stats;
mod store;


// Re-export public types
pub use builder::TtlCacheBuilder;
pub use dispose::{DisposeFn, DisposeReason};
pub use iter::{Iter, Keys, Values};
pub use options::{GetOptions, SetOptions};
pub use stats::CacheStats;
pub use store::TtlCache;
