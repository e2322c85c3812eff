//! Capability interface over the external key-value store.

use crate::StoreResult;
use async_trait::async_trait;
use shaku::Interface;

/// Key-value store operations the cache manager depends on.
///
/// Keys passed here are already namespaced. Implementations report transport
/// failures as [`StoreError`](crate::StoreError) and never disguise them as
/// an empty result, so callers can tell a miss from an outage.
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Reads a value. Returns `None` if the key doesn't exist or has expired.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a value that expires after `ttl_secs` seconds.
    async fn set_ex(&self, key: &str, ttl_secs: u64, value: &str) -> StoreResult<()>;

    /// Deletes keys in one call. Returns how many existed.
    async fn del(&self, keys: &[String]) -> StoreResult<u64>;

    /// Lists keys matching a glob pattern (`prefix:*`).
    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>>;

    /// Liveness probe.
    async fn ping(&self) -> StoreResult<()>;

    /// Freeform diagnostic text (memory section).
    async fn info(&self) -> StoreResult<String>;

    /// Number of resident keys.
    async fn dbsize(&self) -> StoreResult<u64>;
}
