//! Clock Module
//!
//! Time sources the cache reads "now" from. All built-in clocks count
//! milliseconds; TTLs are expressed in the same unit as the clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

// == Clock Trait ==
/// A source of monotonically non-decreasing integer timestamps.
pub trait Clock: Send {
    /// Returns the current instant.
    fn now(&self) -> u64;
}

impl<F> Clock for F
where
    F: Fn() -> u64 + Send,
{
    fn now(&self) -> u64 {
        self()
    }
}

// == Monotonic Clock ==
/// High-resolution clock: milliseconds elapsed since it was created.
///
/// This is the default clock for a cache.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

// == Wall Clock ==
/// Coarser wall-clock source: Unix milliseconds.
///
/// The fallback for targets where `Instant` is unavailable or unreliable
/// (some wasm and embedded platforms), or when readings must be comparable
/// with timestamps produced outside the process. The cache never switches
/// to it on its own; pass it to [`TtlCacheBuilder::clock`].
///
/// Wall time can step backwards, so readings are clamped to never go below
/// the last value handed out.
///
/// [`TtlCacheBuilder::clock`]: crate::cache::TtlCacheBuilder::clock
#[derive(Debug, Default)]
pub struct WallClock {
    last: AtomicU64,
}

impl WallClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for WallClock {
    fn now(&self) -> u64 {
        let wall = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let previous = self.last.fetch_max(wall, Ordering::Relaxed);
        previous.max(wall)
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the cache.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    pub fn new(start: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: u64) {
        self.now.fetch_add(by, Ordering::SeqCst);
    }

    /// Jumps to `to`. Ignored if `to` is in the past.
    pub fn set(&self, to: u64) {
        self.now.fetch_max(to, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
