//! Cache key generators for consistent key naming.
//!
//! Every stored key is `<namespace>:<logical key>`. The functions in this
//! module build the logical part; [`KeyCodec`] adds the namespace.

use std::fmt::Display;

/// Logical prefix of product entries.
pub const PRODUCT: &str = "product";
/// Logical prefix of search result sets.
pub const SEARCH: &str = "search";
/// Logical prefix of user sessions.
pub const SESSION: &str = "session";
/// Logical prefix of fingerprinted GraphQL results.
pub const GRAPHQL: &str = "graphql";
/// Logical prefix of derived ranking views.
pub const RANKINGS: &str = "rankings";

/// Maps logical keys into this process's namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodec {
    namespace: String,
}

impl KeyCodec {
    /// Creates a codec for the given namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Qualifies a logical key. The empty logical key yields `"<namespace>:"`.
    #[must_use]
    pub fn key(&self, logical_key: &str) -> String {
        format!("{}:{}", self.namespace, logical_key)
    }
}

/// Logical key of a product.
#[must_use]
pub fn product(id: impl Display) -> String {
    format!("{}:{}", PRODUCT, id)
}

/// Logical key of a search result set.
#[must_use]
pub fn search(term: &str) -> String {
    format!("{}:{}", SEARCH, normalize_search_term(term))
}

/// Logical key of a user session.
#[must_use]
pub fn session(session_id: &str) -> String {
    format!("{}:{}", SESSION, session_id)
}

/// Logical key of a fingerprinted GraphQL result.
#[must_use]
pub fn graphql(digest: &str) -> String {
    format!("{}:{}", GRAPHQL, digest)
}

/// Trims, lowercases and encodes spaces as `%20`.
///
/// Other characters pass through untouched, so the same term always maps to
/// the same key on the write and read paths.
#[must_use]
pub fn normalize_search_term(term: &str) -> String {
    term.trim().to_lowercase().replace(' ', "%20")
}
