// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the clinicpos sales service.

use thiserror::Error;

/// The error type shared by the storage layer, the HTTP gateway and the binary.
#[derive(Debug, Error)]
pub enum PosError {
    /// Configuration errors (invalid TOML, unknown keys, failed validation).
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing, empty or malformed request input. Maps to HTTP 400.
    #[error("{message}")]
    Validation { message: String },

    /// The persistence layer is unavailable or rejected a statement. Maps to HTTP 500.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PosError {
    /// Build a validation error from a message naming the problem.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Wrap any error raised by the persistence layer.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than the service.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
