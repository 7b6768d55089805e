// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the HTTP gateway and persistence backends.

pub mod store;

pub use store::SalesStore;
