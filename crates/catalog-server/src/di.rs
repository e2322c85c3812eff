//! Dependency injection module using Shaku.
//!
//! The cache store is the only injected component; the [`CacheManager`] on
//! top of it is plain data built from configuration.

use catalog_cache::{
    create_pool, CacheManager, CacheStore, RedisCacheStore, RedisCacheStoreParameters,
};
use catalog_config::{CacheConfig, RedisConfig};
use catalog_core::CatalogResult;
use shaku::{module, HasComponent};
use std::sync::Arc;
use tracing::{info, warn};

// Cache module.
// Contains the Redis-backed store; disabled when Redis is turned off.
module! {
    pub CacheModule {
        components = [
            RedisCacheStore,
        ],
        providers = [],
    }
}

/// Builds the cache module.
///
/// With `redis.enabled = false` the module holds a disabled store.
pub fn build_cache_module(redis_config: &RedisConfig) -> CatalogResult<Arc<CacheModule>> {
    let pool = if redis_config.enabled {
        Some(Arc::new(create_pool(redis_config)?))
    } else {
        warn!("Redis is disabled; every cache read will miss");
        None
    };

    let module = CacheModule::builder()
        .with_component_parameters::<RedisCacheStore>(RedisCacheStoreParameters { pool })
        .build();

    info!("Cache module built");
    Ok(Arc::new(module))
}

/// Resolves the store from the module and builds the manager around it.
pub fn build_cache_manager(module: &CacheModule, cache_config: &CacheConfig) -> CacheManager {
    let store: Arc<dyn CacheStore> = module.resolve();
    CacheManager::from_config(store, cache_config)
}
