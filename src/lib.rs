//! TTL Cache - A bounded in-memory cache
//!
//! Maps keys to values, evicting the least recently used entry when full and
//! dropping entries whose time-to-live has elapsed the next time they are
//! looked at. A dispose callback hears about every entry that leaves.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod shell;

pub use cache::{
    CacheStats, DisposeReason, GetOptions, SetOptions, TtlCache, TtlCacheBuilder,
};
pub use clock::{Clock, ManualClock, MonotonicClock, WallClock};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
