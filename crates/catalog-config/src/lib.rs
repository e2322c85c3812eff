//! # Catalog Config
//!
//! Layered configuration for the catalog cache layer: TOML files,
//! environment variables and runtime reload.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
