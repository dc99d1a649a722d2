//! Cache Builder Module
//!
//! Assembles a [`TtlCache`] from a [`CacheConfig`], an optional clock and an
//! optional dispose callback, validating everything up front.

use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::cache::{DisposeFn, DisposeReason, TtlCache};
use crate::clock::{Clock, MonotonicClock};
use crate::config::CacheConfig;
use crate::error::Result;

/// A builder for [`TtlCache`] instances.
pub struct TtlCacheBuilder<K, V> {
    config: CacheConfig,
    clock: Option<Box<dyn Clock>>,
    dispose: Option<Box<DisposeFn<K, V>>>,
}

impl<K, V> TtlCacheBuilder<K, V> {
    pub fn new() -> Self {
        Self {
            config: CacheConfig::default(),
            clock: None,
            dispose: None,
        }
    }

    /// Replaces every policy field at once.
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the maximum number of entries.
    pub fn max(mut self, max: usize) -> Self {
        self.config.max = Some(max);
        self
    }

    /// Sets the default TTL, in clock units.
    pub fn ttl(mut self, ttl: u64) -> Self {
        self.config.ttl = Some(ttl);
        self
    }

    pub fn update_age_on_get(mut self, enabled: bool) -> Self {
        self.config.update_age_on_get = enabled;
        self
    }

    pub fn no_update_ttl(mut self, enabled: bool) -> Self {
        self.config.no_update_ttl = enabled;
        self
    }

    pub fn no_dispose_on_set(mut self, enabled: bool) -> Self {
        self.config.no_dispose_on_set = enabled;
        self
    }

    /// Uses `clock` instead of the default [`MonotonicClock`].
    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Registers the callback told about every entry leaving the cache.
    pub fn dispose<F>(mut self, dispose: F) -> Self
    where
        F: FnMut(V, K, DisposeReason) + Send + 'static,
    {
        self.dispose = Some(Box::new(dispose));
        self
    }
}

impl<K, V> TtlCacheBuilder<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Validates the configuration and builds the cache.
    pub fn build(self) -> Result<TtlCache<K, V>> {
        self.config.validate()?;
        debug!(
            max = ?self.config.max,
            ttl = ?self.config.ttl,
            update_age_on_get = self.config.update_age_on_get,
            no_update_ttl = self.config.no_update_ttl,
            "building ttl cache"
        );
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(MonotonicClock::new()));
        Ok(TtlCache::from_parts(self.config, clock, self.dispose))
    }
}

impl<K, V> Default for TtlCacheBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for TtlCacheBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCacheBuilder")
            .field("config", &self.config)
            .field("has_clock", &self.clock.is_some())
            .field("has_dispose", &self.dispose.is_some())
            .finish()
    }
}
