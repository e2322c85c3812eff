//! Tracing subscriber setup.

use crate::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_DIRECTIVE: &str = "info,catalog=debug,tower_http=debug";

/// Output format of the log formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(CatalogError::configuration(format!(
                "Unknown log format: {}",
                other
            ))),
        }
    }
}

/// Builds the filter: `RUST_LOG` wins, then the configured level, then the default directive.
fn build_filter(log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match log_level {
        Some(level) => EnvFilter::new(format!("{},catalog=debug,tower_http=debug", level)),
        None => EnvFilter::new(DEFAULT_LOG_DIRECTIVE),
    })
}

/// Installs the global tracing subscriber.
///
/// Fails if a global subscriber has already been installed.
pub fn init_tracing(log_level: Option<&str>, format: LogFormat) -> CatalogResult<()> {
    let filter = build_filter(log_level);

    let result = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
    };

    result.map_err(|e| {
        CatalogError::internal(format!("Failed to install tracing subscriber: {}", e))
    })?;

    tracing::debug!(format = %format, "Tracing initialized");
    Ok(())
}
