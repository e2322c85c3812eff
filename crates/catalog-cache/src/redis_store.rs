//! Redis-based store implementation.

use crate::{CacheStore, StoreError, StoreResult};
use async_trait::async_trait;
use catalog_config::RedisConfig;
use catalog_core::{CatalogError, CatalogResult};
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Create a Redis connection pool.
///
/// Connections are opened lazily; an unreachable server shows up on the
/// first command, not here.
pub fn create_pool(config: &RedisConfig) -> CatalogResult<Pool> {
    info!("Creating Redis connection pool for cache...");

    let timeout = Some(config.connect_timeout());

    let pool = Config::from_url(&config.url)
        .builder()
        .map_err(|e| CatalogError::Configuration(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size)
        .wait_timeout(timeout)
        .create_timeout(timeout)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| CatalogError::Cache(format!("Failed to create Redis pool: {}", e)))?;

    Ok(pool)
}

/// Redis-based cache store.
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    /// Redis connection pool; `None` when caching is disabled.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheStore {
    /// Create a new Redis cache store.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op store (for when Redis is disabled).
    ///
    /// Every operation fails with [`StoreError::Disabled`], so callers can
    /// tell a turned-off cache from a miss.
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Check if caching is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    /// Get a connection from the pool.
    async fn conn(&self) -> StoreResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => Ok(pool.get().await?),
            None => Err(StoreError::Disabled),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn.get(key).await?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: &str) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> StoreResult<u64> {
        if !self.is_enabled() {
            return Err(StoreError::Disabled);
        }
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn().await?;
        let mut cmd = redis::cmd("DEL");
        for key in keys {
            cmd.arg(key);
        }
        let deleted: u64 = cmd.query_async(&mut conn).await?;

        debug!("Deleted {} of {} keys", deleted, keys.len());
        Ok(deleted)
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn().await?;
        // KEYS blocks the server while it walks the keyspace; acceptable for
        // the invalidation volumes this layer sees.
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await?;

        debug!("Pattern '{}' matched {} keys", pattern, keys.len());
        Ok(keys)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn info(&self) -> StoreResult<String> {
        let mut conn = self.conn().await?;
        let info: String = redis::cmd("INFO").arg("memory").query_async(&mut conn).await?;
        Ok(info)
    }

    async fn dbsize(&self) -> StoreResult<u64> {
        let mut conn = self.conn().await?;
        let size: u64 = redis::cmd("DBSIZE").query_async(&mut conn).await?;
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_store() {
        let store = RedisCacheStore::disabled();
        assert!(!store.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_store_reads_report_disabled() {
        let store = RedisCacheStore::disabled();
        assert!(matches!(
            store.get("catalog:product:1").await,
            Err(StoreError::Disabled)
        ));
        assert!(matches!(
            store.keys("catalog:search:*").await,
            Err(StoreError::Disabled)
        ));
        assert!(matches!(
            store.del(&["catalog:product:1".to_string()]).await,
            Err(StoreError::Disabled)
        ));
        assert!(matches!(store.del(&[]).await, Err(StoreError::Disabled)));
    }

    #[tokio::test]
    async fn test_disabled_store_writes_and_probes_fail() {
        let store = RedisCacheStore::disabled();
        assert!(matches!(
            store.set_ex("catalog:product:1", 60, "{}").await,
            Err(StoreError::Disabled)
        ));
        assert!(matches!(store.ping().await, Err(StoreError::Disabled)));
        assert!(matches!(store.info().await, Err(StoreError::Disabled)));
        assert!(matches!(store.dbsize().await, Err(StoreError::Disabled)));
    }

    #[test]
    fn test_create_pool_rejects_bad_url() {
        let config = RedisConfig {
            url: "not-a-redis-url".to_string(),
            ..RedisConfig::default()
        };
        assert!(create_pool(&config).is_err());
    }

    #[test]
    fn test_create_pool_is_lazy() {
        // Nothing listens on this port; building the pool must still succeed.
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            ..RedisConfig::default()
        };
        let pool = create_pool(&config).unwrap();
        assert_eq!(pool.status().max_size, config.pool_size);
    }
}
