//! Cache manager: typed entity caching, invalidation and health reporting.

use crate::fingerprint::hash_query;
use crate::keys::{self, KeyCodec};
use crate::metrics::CacheMetrics;
use crate::{
    CacheStats, CacheStore, EntityClass, StoreError, TtlPolicy, PRODUCT_INVALIDATION_PATTERNS,
};
use catalog_config::CacheConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default number of keys per DEL during pattern invalidation.
pub const DEFAULT_DELETE_BATCH_SIZE: usize = 500;

/// Front door of the caching layer.
///
/// Every operation that talks to the store converts failures into a safe
/// default (`None`, `false`, `0`, or a disconnected [`CacheStats`]), so a
/// cache outage only costs extra load on the source of truth.
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
    codec: KeyCodec,
    policy: TtlPolicy,
    delete_batch_size: usize,
}

impl CacheManager {
    /// Creates a manager with the default TTL policy.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            codec: KeyCodec::new(namespace),
            policy: TtlPolicy::default(),
            delete_batch_size: DEFAULT_DELETE_BATCH_SIZE,
        }
    }

    /// Creates a manager from the `cache` configuration section.
    #[must_use]
    pub fn from_config(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self::new(store, config.namespace.clone())
            .with_policy(TtlPolicy::from(config))
            .with_delete_batch_size(config.delete_batch_size)
    }

    /// Replaces the TTL policy.
    #[must_use]
    pub fn with_policy(mut self, policy: TtlPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets how many keys go into one DEL during pattern invalidation.
    #[must_use]
    pub fn with_delete_batch_size(mut self, batch_size: usize) -> Self {
        self.delete_batch_size = batch_size.max(1);
        self
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.codec.namespace()
    }

    /// Returns the TTL policy.
    #[must_use]
    pub const fn policy(&self) -> &TtlPolicy {
        &self.policy
    }

    /// Qualifies a logical key with the namespace.
    #[must_use]
    pub fn key(&self, logical_key: &str) -> String {
        self.codec.key(logical_key)
    }

    // =========================================================================
    // Generic get / set
    // =========================================================================

    /// Reads and decodes a value.
    ///
    /// Returns `None` on a miss, on a store error, or when the stored payload
    /// does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, logical_key: &str) -> Option<T> {
        self.read(EntityClass::Generic, logical_key).await
    }

    /// Encodes and writes a value with the given TTL.
    ///
    /// Returns `false` instead of an error when the write does not happen:
    /// the store failed, or `value` could not be encoded as JSON (for example
    /// a map with non-string keys). Both cases are logged; nothing is written.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        logical_key: &str,
        value: &T,
        ttl: Duration,
    ) -> bool {
        self.write(EntityClass::Generic, logical_key, value, ttl).await
    }

    /// Reads through the cache, falling back to `fetch` on a miss.
    ///
    /// A fetched value is cached best-effort. Errors from `fetch` propagate
    /// unchanged; cache errors never do.
    pub async fn get_or_populate<T, E, F, Fut>(
        &self,
        logical_key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(logical_key).await {
            return Ok(cached);
        }

        let value = fetch().await?;
        self.set(logical_key, &value, ttl).await;
        Ok(value)
    }

    // =========================================================================
    // GraphQL results
    // =========================================================================

    /// Caches a GraphQL result under its query fingerprint.
    ///
    /// `ttl = None` applies the policy default.
    pub async fn cache_graphql_query<T: Serialize + ?Sized>(
        &self,
        query: &str,
        variables: &Value,
        result: &T,
        ttl: Option<Duration>,
    ) -> bool {
        let logical_key = keys::graphql(&hash_query(query, variables));
        let ttl = ttl.unwrap_or_else(|| self.policy.ttl_for(EntityClass::GraphQl));
        self.write(EntityClass::GraphQl, &logical_key, result, ttl).await
    }

    /// Reads a cached GraphQL result.
    pub async fn get_graphql_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: &Value,
    ) -> Option<T> {
        let logical_key = keys::graphql(&hash_query(query, variables));
        self.read(EntityClass::GraphQl, &logical_key).await
    }

    // =========================================================================
    // Entity helpers
    // =========================================================================

    /// Caches a product under `product:<id>`.
    pub async fn cache_product<T: Serialize + ?Sized>(&self, id: impl Display, data: &T) -> bool {
        let ttl = self.policy.ttl_for(EntityClass::Product);
        self.write(EntityClass::Product, &keys::product(id), data, ttl).await
    }

    /// Reads a cached product.
    pub async fn get_product<T: DeserializeOwned>(&self, id: impl Display) -> Option<T> {
        self.read(EntityClass::Product, &keys::product(id)).await
    }

    /// Caches a search result set under `search:<normalized term>`.
    pub async fn cache_search_results<T: Serialize + ?Sized>(
        &self,
        term: &str,
        results: &T,
    ) -> bool {
        let ttl = self.policy.ttl_for(EntityClass::Search);
        self.write(EntityClass::Search, &keys::search(term), results, ttl).await
    }

    /// Reads a cached search result set. The term is normalized like on write.
    pub async fn get_search_results<T: DeserializeOwned>(&self, term: &str) -> Option<T> {
        self.read(EntityClass::Search, &keys::search(term)).await
    }

    /// Caches a user session under `session:<id>`.
    pub async fn cache_user_session<T: Serialize + ?Sized>(
        &self,
        session_id: &str,
        data: &T,
    ) -> bool {
        let ttl = self.policy.ttl_for(EntityClass::Session);
        self.write(EntityClass::Session, &keys::session(session_id), data, ttl).await
    }

    /// Reads a cached user session.
    pub async fn get_user_session<T: DeserializeOwned>(&self, session_id: &str) -> Option<T> {
        self.read(EntityClass::Session, &keys::session(session_id)).await
    }

    /// Drops a user session. Returns `true` if it existed.
    pub async fn invalidate_user_session(&self, session_id: &str) -> bool {
        let key = self.codec.key(&keys::session(session_id));
        self.delete_keys(&[key]).await > 0
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Purges a product and every derived view that may embed it.
    ///
    /// Deletes `product:<id>`, then sweeps each pattern of
    /// [`PRODUCT_INVALIDATION_PATTERNS`]. Returns the total number of keys
    /// removed. A concurrent write can slip in behind the sweep; such an entry
    /// lives until the next invalidation or its TTL.
    pub async fn invalidate_product_caches(&self, id: impl Display) -> u64 {
        let logical_key = keys::product(&id);
        let mut deleted = self.delete_keys(&[self.codec.key(&logical_key)]).await;

        for pattern in PRODUCT_INVALIDATION_PATTERNS {
            deleted += self.del_pattern(pattern).await;
        }

        info!(product_id = %id, deleted, "Invalidated product caches");
        deleted
    }

    /// Deletes every key matching `<namespace>:<pattern_suffix>`.
    ///
    /// Returns the number deleted; 0 if nothing matched or the store failed.
    pub async fn del_pattern(&self, pattern_suffix: &str) -> u64 {
        let pattern = self.codec.key(pattern_suffix);

        let keys = match self.store.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                self.absorb("keys", &pattern, &e);
                return 0;
            }
        };

        if keys.is_empty() {
            debug!("No keys matched pattern '{}'", pattern);
            return 0;
        }

        let deleted = self.delete_keys(&keys).await;
        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        deleted
    }

    /// Deletes keys in batches; a failed batch does not stop the rest.
    async fn delete_keys(&self, keys: &[String]) -> u64 {
        let mut deleted = 0;

        for batch in keys.chunks(self.delete_batch_size) {
            match self.store.del(batch).await {
                Ok(count) => deleted += count,
                Err(e) => self.absorb("del", &batch[0], &e),
            }
        }

        CacheMetrics::invalidated(deleted);
        deleted
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Returns `true` iff the store answers a ping.
    pub async fn is_healthy(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                self.absorb("ping", self.namespace(), &e);
                false
            }
        }
    }

    /// Collects key count and memory diagnostics from the store.
    pub async fn get_stats(&self) -> CacheStats {
        let collected = async {
            let key_count = self.store.dbsize().await?;
            let memory_info = self.store.info().await?;
            Ok::<_, StoreError>((key_count, memory_info))
        }
        .await;

        match collected {
            Ok((key_count, memory_info)) => CacheStats::connected(key_count, memory_info),
            Err(e) => {
                self.absorb("stats", self.namespace(), &e);
                CacheStats::disconnected(e.to_string())
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn read<T: DeserializeOwned>(&self, class: EntityClass, logical_key: &str) -> Option<T> {
        let key = self.codec.key(logical_key);

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                CacheMetrics::miss(class);
                return None;
            }
            Err(e) => {
                self.absorb("get", &key, &e);
                CacheMetrics::miss(class);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                CacheMetrics::hit(class);
                Some(value)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                CacheMetrics::decode_error(class);
                CacheMetrics::miss(class);
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(
        &self,
        class: EntityClass,
        logical_key: &str,
        value: &T,
        ttl: Duration,
    ) -> bool {
        let key = self.codec.key(logical_key);

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                error!(key = %key, error = %e, "Value cannot be serialized for caching");
                CacheMetrics::set_failed(class);
                return false;
            }
        };

        // SETEX rejects a zero expiry.
        let ttl_secs = ttl.as_secs().max(1);

        match self.store.set_ex(&key, ttl_secs, &json).await {
            Ok(()) => {
                CacheMetrics::set(class);
                true
            }
            Err(e) => {
                self.absorb("set", &key, &e);
                CacheMetrics::set_failed(class);
                false
            }
        }
    }

    fn absorb(&self, operation: &'static str, subject: &str, err: &StoreError) {
        if matches!(err, StoreError::Disabled) {
            debug!(operation, subject, "Cache disabled; treating as miss");
        } else {
            warn!(operation, subject, error = %err, "Cache store error absorbed");
        }
        CacheMetrics::store_error(operation);
    }
}
