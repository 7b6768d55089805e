// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./clinicpos.toml` > `~/.config/clinicpos/clinicpos.toml` >
//! `/etc/clinicpos/clinicpos.toml`, with `CLINICPOS_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PosConfig;

/// File name looked up in each configuration directory.
pub const CONFIG_FILE_NAME: &str = "clinicpos.toml";

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/clinicpos/clinicpos.toml";

/// Per-user configuration file under the XDG config directory, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("clinicpos").join(CONFIG_FILE_NAME))
}

/// Build the layered Figment without extracting it.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/clinicpos/clinicpos.toml`
/// 3. `~/.config/clinicpos/clinicpos.toml`
/// 4. `./clinicpos.toml`
/// 5. `CLINICPOS_*` environment variables
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PosConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<PosConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from one explicit file, skipping the hierarchy.
///
/// Environment overrides still apply. A missing file is an error here,
/// unlike in the hierarchy where absent files are skipped.
pub fn load_config_from_path(path: &Path) -> Result<PosConfig, figment::Error> {
    if !path.is_file() {
        return Err(figment::Error::from(format!(
            "config file `{}` does not exist",
            path.display()
        )));
    }
    Figment::new()
        .merge(Serialized::defaults(PosConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<PosConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PosConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Environment provider mapping `CLINICPOS_SECTION_KEY` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys such as
/// `database_path` contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("CLINICPOS_").map(|key| {
        key.as_str()
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("checkout_", "checkout.", 1)
            .into()
    })
}
