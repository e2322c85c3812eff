//! Cache metrics.
//!
//! Recorded through the `metrics` facade; the host process decides which
//! recorder (if any) receives them.

use crate::EntityClass;
use metrics::{counter, describe_counter};

/// Metric names for the cache layer.
pub mod names {
    /// Reads answered from the cache.
    pub const CACHE_HITS_TOTAL: &str = "catalog_cache_hits_total";
    /// Reads that fell through to the source of truth.
    pub const CACHE_MISSES_TOTAL: &str = "catalog_cache_misses_total";
    /// Successful writes.
    pub const CACHE_SETS_TOTAL: &str = "catalog_cache_sets_total";
    /// Writes that did not reach the store.
    pub const CACHE_SET_FAILURES_TOTAL: &str = "catalog_cache_set_failures_total";
    /// Store errors absorbed by the manager.
    pub const CACHE_STORE_ERRORS_TOTAL: &str = "catalog_cache_store_errors_total";
    /// Stored payloads that could not be decoded.
    pub const CACHE_DECODE_ERRORS_TOTAL: &str = "catalog_cache_decode_errors_total";
    /// Keys removed by explicit or pattern invalidation.
    pub const CACHE_INVALIDATED_KEYS_TOTAL: &str = "catalog_cache_invalidated_keys_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Total number of cache misses");
    describe_counter!(names::CACHE_SETS_TOTAL, "Total number of successful cache writes");
    describe_counter!(
        names::CACHE_SET_FAILURES_TOTAL,
        "Total number of cache writes that failed"
    );
    describe_counter!(
        names::CACHE_STORE_ERRORS_TOTAL,
        "Total number of store errors absorbed by the cache layer"
    );
    describe_counter!(
        names::CACHE_DECODE_ERRORS_TOTAL,
        "Total number of cached payloads that failed to decode"
    );
    describe_counter!(
        names::CACHE_INVALIDATED_KEYS_TOTAL,
        "Total number of keys removed by invalidation"
    );
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a cache hit.
    pub fn hit(class: EntityClass) {
        counter!(names::CACHE_HITS_TOTAL, "class" => class.as_str()).increment(1);
    }

    /// Record a cache miss.
    pub fn miss(class: EntityClass) {
        counter!(names::CACHE_MISSES_TOTAL, "class" => class.as_str()).increment(1);
    }

    /// Record a successful write.
    pub fn set(class: EntityClass) {
        counter!(names::CACHE_SETS_TOTAL, "class" => class.as_str()).increment(1);
    }

    /// Record a failed write.
    pub fn set_failed(class: EntityClass) {
        counter!(names::CACHE_SET_FAILURES_TOTAL, "class" => class.as_str()).increment(1);
    }

    /// Record a store error.
    pub fn store_error(operation: &'static str) {
        counter!(names::CACHE_STORE_ERRORS_TOTAL, "operation" => operation).increment(1);
    }

    /// Record an undecodable payload.
    pub fn decode_error(class: EntityClass) {
        counter!(names::CACHE_DECODE_ERRORS_TOTAL, "class" => class.as_str()).increment(1);
    }

    /// Record invalidated keys.
    pub fn invalidated(count: u64) {
        counter!(names::CACHE_INVALIDATED_KEYS_TOTAL).increment(count);
    }
}
