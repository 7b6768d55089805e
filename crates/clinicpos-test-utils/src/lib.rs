// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for clinicpos integration tests.
//!
//! - [`TestHarness`] - temp SQLite ledger behind an in-process router
//! - [`FailingStore`] - a store whose every call fails, for the 500 path

pub mod harness;
pub mod mock_store;

pub use harness::{send, TestHarness, TestResponse};
pub use mock_store::FailingStore;
