//! TTL policy and invalidation sets.

use catalog_config::CacheConfig;
use std::time::Duration;

/// TTL for product entries (1 hour).
pub const PRODUCT_TTL: Duration = Duration::from_secs(3600);

/// TTL for search result sets (30 minutes).
pub const SEARCH_TTL: Duration = Duration::from_secs(1800);

/// TTL for user sessions (24 hours).
pub const SESSION_TTL: Duration = Duration::from_secs(86400);

/// TTL for GraphQL results when the caller does not pick one (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Patterns purged, relative to the namespace, when a product mutates.
///
/// These hold derived views that may embed the product.
pub const PRODUCT_INVALIDATION_PATTERNS: [&str; 3] = ["search:*", "rankings:*", "graphql:*"];

/// Classes of cached values. Used to pick a TTL and to label metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Product,
    Search,
    Session,
    GraphQl,
    /// Anything written through the untyped `get`/`set` pair.
    Generic,
}

impl EntityClass {
    /// Metric label for this class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Search => "search",
            Self::Session => "session",
            Self::GraphQl => "graphql",
            Self::Generic => "generic",
        }
    }
}

/// Fixed expiry per entity class. Built once at startup, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub product: Duration,
    pub search: Duration,
    pub session: Duration,
    pub graphql_default: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            product: PRODUCT_TTL,
            search: SEARCH_TTL,
            session: SESSION_TTL,
            graphql_default: DEFAULT_TTL,
        }
    }
}

impl TtlPolicy {
    /// Returns the TTL for a class. `Generic` entries use the GraphQL default.
    #[must_use]
    pub const fn ttl_for(&self, class: EntityClass) -> Duration {
        match class {
            EntityClass::Product => self.product,
            EntityClass::Search => self.search,
            EntityClass::Session => self.session,
            EntityClass::GraphQl | EntityClass::Generic => self.graphql_default,
        }
    }
}

impl From<&CacheConfig> for TtlPolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            product: Duration::from_secs(config.product_ttl_secs),
            search: Duration::from_secs(config.search_ttl_secs),
            session: Duration::from_secs(config.session_ttl_secs),
            graphql_default: Duration::from_secs(config.default_ttl_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.ttl_for(EntityClass::Product).as_secs(), 3600);
        assert_eq!(policy.ttl_for(EntityClass::Search).as_secs(), 1800);
        assert_eq!(policy.ttl_for(EntityClass::Session).as_secs(), 86400);
        assert_eq!(policy.ttl_for(EntityClass::GraphQl).as_secs(), 300);
        assert_eq!(policy.ttl_for(EntityClass::Generic).as_secs(), 300);
    }

    #[test]
    fn test_policy_from_default_config_matches_default() {
        assert_eq!(TtlPolicy::from(&CacheConfig::default()), TtlPolicy::default());
    }

    #[test]
    fn test_policy_from_config() {
        let config = CacheConfig {
            default_ttl_secs: 60,
            ..CacheConfig::default()
        };
        let policy = TtlPolicy::from(&config);
        assert_eq!(policy.graphql_default, Duration::from_secs(60));
        assert_eq!(policy.product, PRODUCT_TTL);
    }

    #[test]
    fn test_product_invalidation_patterns() {
        assert_eq!(
            PRODUCT_INVALIDATION_PATTERNS,
            ["search:*", "rankings:*", "graphql:*"]
        );
    }

    #[test]
    fn test_class_labels() {
        assert_eq!(EntityClass::GraphQl.as_str(), "graphql");
        assert_eq!(EntityClass::Generic.as_str(), "generic");
    }
}
