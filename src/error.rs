//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Only configuration can fail. Once a cache has been built, lookups that
/// find nothing return `None`/`false` rather than an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity was configured as zero
    #[error("Invalid capacity: max must be at least 1")]
    InvalidCapacity,

    /// A TTL was configured as zero
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// A configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed shell command
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CacheError::InvalidCapacity.to_string(),
            "Invalid capacity: max must be at least 1"
        );
        assert_eq!(
            CacheError::InvalidTtl("ttl must be positive".to_string()).to_string(),
            "Invalid TTL: ttl must be positive"
        );
    }
}
