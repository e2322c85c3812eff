//! # Catalog Cache
//!
//! Caching and invalidation layer in front of the product catalog's
//! relational store and GraphQL resolvers.
//!
//! - [`keys`]: namespaced key codec and logical key conventions
//! - [`fingerprint`]: content-addressed keys for GraphQL results
//! - [`CacheStore`]: capability interface over the key-value store, with a
//!   Redis implementation in [`RedisCacheStore`]
//! - [`CacheManager`]: typed entity caching, invalidation, health and stats
//!
//! Store failures never escape [`CacheManager`]; a cache outage degrades to
//! "always miss".

mod error;
pub mod fingerprint;
pub mod keys;
mod manager;
pub mod metrics;
mod policy;
mod redis_store;
mod stats;
mod store;

pub use error::{StoreError, StoreResult};
pub use fingerprint::hash_query;
pub use keys::KeyCodec;
pub use manager::{CacheManager, DEFAULT_DELETE_BATCH_SIZE};
pub use policy::{
    EntityClass, TtlPolicy, DEFAULT_TTL, PRODUCT_INVALIDATION_PATTERNS, PRODUCT_TTL, SEARCH_TTL,
    SESSION_TTL,
};
pub use redis_store::{create_pool, RedisCacheStore, RedisCacheStoreParameters};
pub use stats::CacheStats;
pub use store::CacheStore;
