// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store double that fails every operation.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use clinicpos_core::{HealthStatus, NewSale, PosError, SaleFilter, SaleRow, SalesStore};

/// A [`SalesStore`] whose calls all fail with a storage error.
///
/// Counts the calls it received so tests can tell validation short-circuited
/// before reaching the store.
pub struct FailingStore {
    message: String,
    calls: AtomicUsize,
}

impl FailingStore {
    /// Fail with `message` as the underlying storage error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> PosError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PosError::storage(self.message.clone())
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new("disk I/O error")
    }
}

#[async_trait]
impl SalesStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn initialize(&self) -> Result<(), PosError> {
        Err(self.fail())
    }

    async fn record_sale(&self, _sale: &NewSale) -> Result<i64, PosError> {
        Err(self.fail())
    }

    async fn list_sales(&self, _filter: &SaleFilter) -> Result<Vec<SaleRow>, PosError> {
        Err(self.fail())
    }

    async fn health_check(&self) -> Result<HealthStatus, PosError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HealthStatus::Unhealthy(self.message.clone()))
    }
}
