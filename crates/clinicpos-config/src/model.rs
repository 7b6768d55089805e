// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PosConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite ledger settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Checkout validation settings.
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind. `0` picks a free port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Allow cross-origin requests from any origin (the till UI runs in a browser).
    #[serde(default = "default_permissive_cors")]
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            permissive_cors: default_permissive_cors(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_permissive_cors() -> bool {
    true
}

/// SQLite ledger configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file, relative to the working directory
    /// unless absolute.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// How long a connection waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    "sales.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Checkout validation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CheckoutConfig {
    /// Require non-empty `name` and `op_number` on every checkout.
    #[serde(default = "default_require_operator")]
    pub require_operator: bool,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            require_operator: default_require_operator(),
        }
    }
}

fn default_require_operator() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_service() {
        let config = PosConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.database_path, "sales.db");
        assert!(config.server.permissive_cors);
        assert!(config.checkout.require_operator);
    }

    #[test]
    fn partial_section_fills_defaults() {
        let config: PosConfig = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(toml::from_str::<PosConfig>("[printer]\nenabled = true\n").is_err());
    }
}
