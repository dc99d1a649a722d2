//! Configuration Module
//!
//! Holds the construction-time cache policy and loads it from environment
//! variables for the shell binary.

use std::env;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Construction-time cache policy.
///
/// Every per-call option falls back to the matching field here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries, `None` for unbounded
    pub max: Option<usize>,
    /// Default TTL applied to entries set without one, `None` for no expiration
    pub ttl: Option<u64>,
    /// Restart an entry's TTL window whenever it is read
    pub update_age_on_get: bool,
    /// Keep the existing expiration when an existing key is overwritten
    pub no_update_ttl: bool,
    /// Skip the `set` disposal when an existing key is overwritten
    pub no_dispose_on_set: bool,
}

impl CacheConfig {
    // == Validate ==
    /// Rejects values outside their declared domain.
    pub fn validate(&self) -> Result<()> {
        if self.max == Some(0) {
            return Err(CacheError::InvalidCapacity);
        }
        if self.ttl == Some(0) {
            return Err(CacheError::InvalidTtl(
                "default ttl must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    // == From Env ==
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TTL_CACHE_MAX` - Maximum entries (default: unbounded)
    /// - `TTL_CACHE_TTL` - Default TTL in milliseconds (default: none)
    /// - `TTL_CACHE_UPDATE_AGE_ON_GET` - `true`/`false` (default: false)
    /// - `TTL_CACHE_NO_UPDATE_TTL` - `true`/`false` (default: false)
    /// - `TTL_CACHE_NO_DISPOSE_ON_SET` - `true`/`false` (default: false)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`CacheConfig::from_env`] but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            max: parse_var(&lookup, "TTL_CACHE_MAX")?,
            ttl: parse_var(&lookup, "TTL_CACHE_TTL")?,
            update_age_on_get: parse_flag(&lookup, "TTL_CACHE_UPDATE_AGE_ON_GET")?,
            no_update_ttl: parse_flag(&lookup, "TTL_CACHE_NO_UPDATE_TTL")?,
            no_dispose_on_set: parse_flag(&lookup, "TTL_CACHE_NO_DISPOSE_ON_SET")?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig(format!("{} has invalid value '{}'", name, raw))),
        _ => Ok(None),
    }
}

fn parse_flag<F>(lookup: &F, name: &str) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some("1") | Some("true") | Some("yes") | Some("on") => Ok(true),
        Some("0") | Some("false") | Some("no") | Some("off") => Ok(false),
        Some(other) => Err(CacheError::InvalidConfig(format!(
            "{} has invalid value '{}'",
            name, other
        ))),
    }
}
