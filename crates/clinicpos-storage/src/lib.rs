// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the clinicpos sales ledger.
//!
//! Embedded versioned migrations (with adoption of legacy unversioned
//! ledgers), one short-lived `tokio-rusqlite` connection per operation, and
//! the append/list queries behind [`SqliteStorage`].

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use migrations::MigrationReport;
