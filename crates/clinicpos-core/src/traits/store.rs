// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait for the append-only sales ledger.

use async_trait::async_trait;

use crate::error::PosError;
use crate::filter::SaleFilter;
use crate::types::{HealthStatus, NewSale, SaleRow};

/// Persistence backend for the sales ledger.
///
/// The ledger is append-only, so there is no update or delete.
/// Implementations must return listings ordered by descending `id`.
#[async_trait]
pub trait SalesStore: Send + Sync + 'static {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &str;

    /// Brings the schema up to date. Called once, before any other operation.
    async fn initialize(&self) -> Result<(), PosError>;

    /// Appends one sale and returns the id the store assigned to it.
    async fn record_sale(&self, sale: &NewSale) -> Result<i64, PosError>;

    /// Lists sales matching `filter`, newest first.
    async fn list_sales(&self, filter: &SaleFilter) -> Result<Vec<SaleRow>, PosError>;

    /// Probes the backend.
    async fn health_check(&self) -> Result<HealthStatus, PosError>;
}
