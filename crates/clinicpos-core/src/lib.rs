// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the clinicpos sales service.
//!
//! Holds the sale ledger domain types, the checkout validation rules, the
//! listing filters, the error taxonomy shared by every crate, and the
//! [`SalesStore`] trait that persistence backends implement.

pub mod checkout;
pub mod error;
pub mod filter;
pub mod traits;
pub mod types;

pub use checkout::CheckoutRequest;
pub use error::PosError;
pub use filter::{FilterParams, SaleFilter};
pub use traits::SalesStore;
pub use types::{HealthStatus, NewSale, Sale, SaleRow};
