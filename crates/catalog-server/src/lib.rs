//! # Catalog Server Library
//!
//! Wiring for the catalog cache layer and the operational HTTP endpoints
//! (`/healthz`, cache stats, manual invalidation).

pub mod di;
pub mod responses;
pub mod router;

pub use router::{create_router, AppState};
