// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean" suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a key to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error ready for rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in a section.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(clinicpos::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
    },

    /// A value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(clinicpos::config::invalid_type))]
    InvalidType { key: String, detail: String },

    /// A semantic check failed after deserialization.
    #[error("validation error: {message}")]
    #[diagnostic(code(clinicpos::config::validation))]
    Validation { message: String },

    /// Anything else Figment reports (unreadable file, bad TOML syntax).
    #[error("configuration error: {0}")]
    #[diagnostic(code(clinicpos::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert every error carried by a `figment::Error` into a [`ConfigError`].
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, expected),
                valid_keys: expected.join(", "),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Suggest the valid key closest to `unknown`, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render errors to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("error: {error}");
        }
    }
}
