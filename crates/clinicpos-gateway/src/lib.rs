// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP interface of the clinicpos sales service.
//!
//! Routes:
//! - `GET /` static summary
//! - `POST /checkout` record a sale, `GET /checkout` usage hint
//! - `GET /sales` filtered JSON listing, newest first
//! - `GET /export_csv` the same listing as a CSV attachment
//! - `GET /health` store probe

pub mod error;
pub mod export;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{bind, router, serve, AppState, ServerConfig};
