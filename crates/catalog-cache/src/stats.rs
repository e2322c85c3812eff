//! Operational cache statistics.

use serde::{Deserialize, Serialize};

/// Snapshot reported by [`CacheManager::get_stats`](crate::CacheManager::get_stats).
///
/// Serializes as `{"connected":true,"keyCount":..,"memoryInfo":..}` or
/// `{"connected":false,"error":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Whether the store answered.
    pub connected: bool,
    /// Resident key count reported by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_count: Option<u64>,
    /// Diagnostic text reported by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_info: Option<String>,
    /// Message of the error that prevented collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CacheStats {
    /// Stats of a reachable store.
    #[must_use]
    pub fn connected(key_count: u64, memory_info: impl Into<String>) -> Self {
        Self {
            connected: true,
            key_count: Some(key_count),
            memory_info: Some(memory_info.into()),
            error: None,
        }
    }

    /// Stats of an unreachable store.
    #[must_use]
    pub fn disconnected(error: impl Into<String>) -> Self {
        Self {
            connected: false,
            key_count: None,
            memory_info: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connected_shape() {
        let stats = CacheStats::connected(42, "used_memory:1024");
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"connected": true, "keyCount": 42, "memoryInfo": "used_memory:1024"})
        );
    }

    #[test]
    fn test_disconnected_shape() {
        let stats = CacheStats::disconnected("Connection refused");
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"connected": false, "error": "Connection refused"})
        );
    }

    #[test]
    fn test_deserialize() {
        let stats: CacheStats = serde_json::from_str(r#"{"connected":false,"error":"x"}"#).unwrap();
        assert_eq!(stats, CacheStats::disconnected("x"));
    }
}
