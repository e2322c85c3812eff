//! Store adapter error types.

use catalog_core::CatalogError;
use thiserror::Error;

/// Result type for store adapter operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a [`CacheStore`](crate::CacheStore).
///
/// A miss is never an error; every variant means the store could not answer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Redis protocol or connection error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Redis pool error.
    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// Caching is turned off in configuration.
    #[error("Cache is disabled")]
    Disabled,

    /// Store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        CatalogError::Cache(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(StoreError::Disabled.to_string(), "Cache is disabled");
        assert_eq!(
            StoreError::Unavailable("connection refused".into()).to_string(),
            "Store unavailable: connection refused"
        );
    }

    #[test]
    fn test_into_catalog_error() {
        let err: CatalogError = StoreError::Unavailable("timeout".into()).into();
        match err {
            CatalogError::Cache(msg) => assert!(msg.contains("timeout")),
            _ => panic!("Expected Cache error"),
        }
    }

    #[test]
    fn test_from_redis_error() {
        let redis_err = redis::RedisError::from((redis::ErrorKind::IoError, "broken pipe"));
        let err = StoreError::from(redis_err);
        assert!(matches!(err, StoreError::Redis(_)));
        assert!(err.to_string().contains("broken pipe"));
    }
}
