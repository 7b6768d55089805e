// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the clinicpos sales service.
//!
//! TOML files with strict key checking (`deny_unknown_fields`), an XDG file
//! hierarchy, `CLINICPOS_*` environment overrides, and miette diagnostics
//! with typo suggestions.
//!
//! ```no_run
//! let config = clinicpos_config::load_and_validate().expect("config errors");
//! println!("ledger at {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{CheckoutConfig, PosConfig, ServerConfig, StorageConfig};

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<PosConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from one explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<PosConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<PosConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

#[allow(clippy::result_large_err)]
fn finish(loaded: Result<PosConfig, figment::Error>) -> Result<PosConfig, Vec<ConfigError>> {
    let config = loaded.map_err(diagnostic::figment_to_config_errors)?;
    validation::validate_config(&config)?;
    Ok(config)
}
