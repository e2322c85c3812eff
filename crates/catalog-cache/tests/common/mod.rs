//! Common test infrastructure for cache manager tests.
//!
//! [`RecordingStore`] is an in-memory [`CacheStore`] that records every call
//! and can be switched into a failing mode to simulate an outage.

#![allow(dead_code)]

use async_trait::async_trait;
use catalog_cache::{CacheStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A store call as observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get(String),
    SetEx {
        key: String,
        ttl_secs: u64,
        value: String,
    },
    Del(Vec<String>),
    Keys(String),
    Ping,
    Info,
    DbSize,
}

/// In-memory store that records calls.
#[derive(Default)]
pub struct RecordingStore {
    entries: Mutex<BTreeMap<String, (String, u64)>>,
    calls: Mutex<Vec<StoreCall>>,
    failing: AtomicBool,
    del_count: AtomicUsize,
    failing_del: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes only the `n`th DEL (1-based) fail. 0 disables.
    pub fn fail_nth_del(&self, n: usize) {
        self.failing_del.store(n, Ordering::SeqCst);
    }

    /// Seeds a raw entry without recording a call.
    pub fn insert_raw(&self, key: &str, value: &str, ttl_secs: u64) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl_secs));
    }

    /// Raw stored value.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    /// TTL the key was last written with.
    pub fn ttl(&self, key: &str) -> Option<u64> {
        self.entries.lock().unwrap().get(key).map(|(_, t)| *t)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    /// All stored keys, sorted.
    pub fn stored_keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Key lists of every DEL issued, in order.
    pub fn del_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Del(keys) => Some(keys),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) -> StoreResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for RecordingStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.record(StoreCall::Get(key.to_string()))?;
        Ok(self.raw(key))
    }

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: &str) -> StoreResult<()> {
        self.record(StoreCall::SetEx {
            key: key.to_string(),
            ttl_secs,
            value: value.to_string(),
        })?;
        self.insert_raw(key, value, ttl_secs);
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> StoreResult<u64> {
        self.record(StoreCall::Del(keys.to_vec()))?;
        let nth = self.del_count.fetch_add(1, Ordering::SeqCst) + 1;
        if nth == self.failing_del.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection reset".to_string()));
        }
        let mut entries = self.entries.lock().unwrap();
        let deleted = keys.iter().filter(|k| entries.remove(*k).is_some()).count();
        Ok(deleted as u64)
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.record(StoreCall::Keys(pattern.to_string()))?;
        Ok(self
            .stored_keys()
            .into_iter()
            .filter(|k| glob_match(pattern, k))
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.record(StoreCall::Ping)
    }

    async fn info(&self) -> StoreResult<String> {
        self.record(StoreCall::Info)?;
        Ok("# Memory\r\nused_memory:1024\r\n".to_string())
    }

    async fn dbsize(&self) -> StoreResult<u64> {
        self.record(StoreCall::DbSize)?;
        Ok(self.entries.lock().unwrap().len() as u64)
    }
}

/// Glob match supporting `*` and `?`.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    fn matches(p: &[u8], t: &[u8]) -> bool {
        match (p.first(), t.first()) {
            (None, None) => true,
            (Some(b'*'), _) => matches(&p[1..], t) || (!t.is_empty() && matches(p, &t[1..])),
            (Some(b'?'), Some(_)) => matches(&p[1..], &t[1..]),
            (Some(a), Some(b)) if a == b => matches(&p[1..], &t[1..]),
            _ => false,
        }
    }
    matches(pattern.as_bytes(), text.as_bytes())
}

#[test]
fn test_glob_match() {
    assert!(glob_match("catalog:search:*", "catalog:search:laptop"));
    assert!(glob_match("catalog:search:*", "catalog:search:"));
    assert!(!glob_match("catalog:search:*", "other:search:laptop"));
    assert!(glob_match("catalog:product:?", "catalog:product:1"));
    assert!(!glob_match("catalog:product:?", "catalog:product:12"));
}
