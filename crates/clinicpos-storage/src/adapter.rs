// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`SalesStore`] trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use clinicpos_config::StorageConfig;
use clinicpos_core::{HealthStatus, NewSale, PosError, SaleFilter, SaleRow, SalesStore};

use crate::database::{map_tr_err, Database};
use crate::migrations::MigrationReport;
use crate::queries;

/// SQLite-backed sales ledger.
///
/// The schema is brought up to date by [`SalesStore::initialize`]; every
/// other operation fails until that has succeeded.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a store for the configured file. Nothing is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, PosError> {
        let storage = Self::new(config);
        storage.initialize().await?;
        Ok(storage)
    }

    /// Run the schema initializer and return what it changed.
    pub async fn initialize_with_report(&self) -> Result<MigrationReport, PosError> {
        let db = Database::new(&self.config);
        let report = db.migrate().await?;
        self.db.set(db).map_err(|_| PosError::storage("storage already initialized"))?;
        info!(
            path = %self.config.database_path,
            applied = report.applied.len(),
            adopted_rows = report.adopted_rows,
            "sales ledger ready"
        );
        Ok(report)
    }

    /// Returns the underlying database, or an error if not initialized.
    pub fn database(&self) -> Result<&Database, PosError> {
        self.db
            .get()
            .ok_or_else(|| PosError::storage("storage not initialized, call initialize() first"))
    }
}

#[async_trait]
impl SalesStore for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn initialize(&self) -> Result<(), PosError> {
        self.initialize_with_report().await.map(|_| ())
    }

    async fn record_sale(&self, sale: &NewSale) -> Result<i64, PosError> {
        queries::sales::insert_sale(self.database()?, sale).await
    }

    async fn list_sales(&self, filter: &SaleFilter) -> Result<Vec<SaleRow>, PosError> {
        queries::sales::list_sales(self.database()?, filter).await
    }

    async fn health_check(&self) -> Result<HealthStatus, PosError> {
        let db = self.database()?;
        let conn = db.connect().await?;
        let probe = conn
            .call(|conn| conn.execute_batch("SELECT 1;"))
            .await
            .map_err(map_tr_err);
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    fn make_config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.display().to_string(),
            busy_timeout_ms: 1000,
        }
    }

    fn make_sale() -> NewSale {
        NewSale {
            name: Some("Jane".into()),
            op_number: Some("OP-1".into()),
            cart: json!([{"item": "aspirin", "qty": 2}]),
            total: 9.5,
            discount: 0.0,
        }
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(&dir.path().join("uninit.db")));

        assert!(storage.record_sale(&make_sale()).await.is_err());
        assert!(storage.health_check().await.is_err());
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(&dir.path().join("double.db")));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::open(make_config(&dir.path().join("health.db")))
            .await
            .unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn record_then_list_through_trait_object() {
        let dir = tempdir().unwrap();
        let storage: Box<dyn SalesStore> = Box::new(
            SqliteStorage::open(make_config(&dir.path().join("dyn.db")))
                .await
                .unwrap(),
        );

        let first = storage.record_sale(&make_sale()).await.unwrap();
        let second = storage.record_sale(&make_sale()).await.unwrap();
        assert!(second > first);

        let rows = storage.list_sales(&SaleFilter::default()).await.unwrap();
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![second, first]);
        let sale = rows[0].clone().into_sale().unwrap();
        assert_eq!(sale.cart, json!([{"item": "aspirin", "qty": 2}]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_wait_instead_of_failing() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("busy.db").display().to_string(),
            busy_timeout_ms: 5000,
        };
        let storage = std::sync::Arc::new(SqliteStorage::open(config).await.unwrap());

        let writers: Vec<_> = (0..16)
            .map(|_| {
                let storage = storage.clone();
                tokio::spawn(async move { storage.record_sale(&make_sale()).await })
            })
            .collect();

        let mut ids = Vec::new();
        for writer in writers {
            ids.push(writer.await.unwrap().unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16, "every writer gets its own id");

        let rows = storage.list_sales(&SaleFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 16);
    }

    #[traced_test]
    #[tokio::test]
    async fn listing_leaves_request_logging_to_the_caller() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::open(make_config(&dir.path().join("quiet.db")))
            .await
            .unwrap();
        storage.record_sale(&make_sale()).await.unwrap();

        let rows = storage.list_sales(&SaleFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(logs_contain("sales ledger ready"));
        assert!(!logs_contain("listed sales"));
    }

    #[tokio::test]
    async fn data_survives_reopening() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("durable.db");

        let storage = SqliteStorage::open(make_config(&path)).await.unwrap();
        storage.record_sale(&make_sale()).await.unwrap();
        drop(storage);

        let reopened = SqliteStorage::open(make_config(&path)).await.unwrap();
        let rows = reopened.list_sales(&SaleFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
