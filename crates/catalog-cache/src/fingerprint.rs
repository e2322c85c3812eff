//! Query fingerprints for content-addressed GraphQL result keys.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Length of a fingerprint in hex characters (128 bits).
pub const DIGEST_HEX_LEN: usize = 32;

/// Fingerprints a `(query, variables)` pair.
///
/// Object keys in `variables` are sorted recursively before hashing, so
/// incidental key order never changes the digest. The result is the first
/// 128 bits of a SHA-256 digest as lowercase hex.
#[must_use]
pub fn hash_query(query: &str, variables: &Value) -> String {
    let canonical = canonicalize(variables).to_string();

    let mut hasher = Sha256::new();
    // Length prefix keeps the query/variables boundary unambiguous.
    hasher.update((query.len() as u64).to_be_bytes());
    hasher.update(query.as_bytes());
    hasher.update(canonical.as_bytes());

    let digest = hasher.finalize();
    hex::encode(&digest[..DIGEST_HEX_LEN / 2])
}

/// Sorts object keys recursively.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), canonicalize(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        _ => value.clone(),
    }
}
