//! Control-plane configuration.

use std::env;

/// Control-plane service configuration.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    /// Bind address for the HTTP listener.
    pub listen: String,
    /// Log level filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl ControlConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen: env::var("STRATUS_LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_owned()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned()),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}
