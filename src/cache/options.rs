//! Per-call Options Module
//!
//! Optional overrides for a single `set` or `get`. Unset fields fall back to
//! the cache's [`CacheConfig`](crate::config::CacheConfig).

use crate::error::{CacheError, Result};

// == Set Options ==
/// Overrides for one `set_with` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// TTL for this entry only
    pub ttl: Option<u64>,
    /// Keep the existing expiration if the key is already present
    pub no_update_ttl: Option<bool>,
    /// Skip the `set` disposal for the value being replaced
    pub no_dispose_on_set: Option<bool>,
}

impl SetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn no_update_ttl(mut self, enabled: bool) -> Self {
        self.no_update_ttl = Some(enabled);
        self
    }

    pub fn no_dispose_on_set(mut self, enabled: bool) -> Self {
        self.no_dispose_on_set = Some(enabled);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_ttl(self.ttl)
    }
}

// == Get Options ==
/// Overrides for one `get_with` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Restart the entry's TTL window on this read
    pub update_age_on_get: Option<bool>,
    /// TTL to apply when the window is restarted
    pub ttl: Option<u64>,
}

impl GetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_age_on_get(mut self, enabled: bool) -> Self {
        self.update_age_on_get = Some(enabled);
        self
    }

    pub fn ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_ttl(self.ttl)
    }
}

fn validate_ttl(ttl: Option<u64>) -> Result<()> {
    if ttl == Some(0) {
        return Err(CacheError::InvalidTtl(
            "per-call ttl must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
