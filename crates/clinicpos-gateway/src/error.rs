// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of [`PosError`] onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clinicpos_core::PosError;
use serde::Serialize;

/// `{"status": ...}` envelope used by the checkout endpoint and every error.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success",
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
        }
    }
}

/// A [`PosError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub PosError);

impl From<PosError> for ApiError {
    fn from(e: PosError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            PosError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            tracing::warn!(error = %self.0, "request rejected");
        } else {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(StatusResponse::error(self.0.to_string()))).into_response()
    }
}
