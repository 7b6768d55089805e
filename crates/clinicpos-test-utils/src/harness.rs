// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` initializes a SQLite ledger in a temp directory and wires it
//! into the real router. Requests go through `tower::ServiceExt::oneshot`, so
//! no socket is bound.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use clinicpos_config::{CheckoutConfig, PosConfig, StorageConfig};
use clinicpos_core::{PosError, SalesStore};
use clinicpos_gateway::{router, AppState};
use clinicpos_storage::{MigrationReport, SqliteStorage};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    require_operator: bool,
    seed_sql: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            require_operator: true,
            seed_sql: None,
        }
    }

    /// Toggle whether checkout requires `name` and `op_number`.
    pub fn require_operator(mut self, required: bool) -> Self {
        self.require_operator = required;
        self
    }

    /// Run raw SQL against the database file before the schema initializer,
    /// e.g. to lay down a ledger written by an older service.
    pub fn seed_sql(mut self, sql: impl Into<String>) -> Self {
        self.seed_sql = Some(sql.into());
        self
    }

    /// Build the harness: seed, initialize the ledger, assemble the router.
    pub async fn build(self) -> Result<TestHarness, PosError> {
        let temp_dir = tempfile::TempDir::new().map_err(PosError::storage)?;
        let db_path = temp_dir.path().join("sales.db");

        if let Some(sql) = self.seed_sql {
            let conn = tokio_rusqlite::Connection::open(&db_path)
                .await
                .map_err(PosError::storage)?;
            conn.call(move |conn| conn.execute_batch(&sql))
                .await
                .map_err(PosError::storage)?;
        }

        let config = PosConfig {
            storage: StorageConfig {
                database_path: db_path.display().to_string(),
                ..StorageConfig::default()
            },
            checkout: CheckoutConfig {
                require_operator: self.require_operator,
            },
            ..PosConfig::default()
        };

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        let migration_report = storage.initialize_with_report().await?;

        let store: Arc<dyn SalesStore> = storage.clone();
        let router = router(
            AppState::new(store, config.checkout.require_operator),
            config.server.permissive_cors,
        );

        Ok(TestHarness {
            storage,
            config,
            migration_report,
            router,
            db_path,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment: temp ledger plus the real router.
pub struct TestHarness {
    /// SQLite store (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    /// Configuration the harness was built with.
    pub config: PosConfig,
    /// What the schema initializer did at build time.
    pub migration_report: MigrationReport,
    router: Router,
    db_path: PathBuf,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON. Panics when it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    /// Body as UTF-8 text. Panics on invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("response body is not UTF-8")
    }

    /// A header value as text, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Drive one request through `app` and buffer the response.
pub async fn send(app: Router, req: Request<Body>) -> TestResponse {
    let resp = app.oneshot(req).await.expect("router is infallible");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to buffer response body");
    TestResponse {
        status,
        headers,
        body,
    }
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default settings.
    pub async fn start() -> Result<Self, PosError> {
        Self::builder().build().await
    }

    /// A clone of the assembled router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Path of the temp database file.
    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Send an arbitrary request.
    pub async fn request(&self, req: Request<Body>) -> TestResponse {
        send(self.router(), req).await
    }

    /// POST `body` to `/checkout` without a content type, as the legacy till does.
    pub async fn post_checkout(&self, body: &Value) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri("/checkout")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.request(req).await
    }

    /// GET `uri`.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let req = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        self.request(req).await
    }

    /// Insert a row with an explicit creation time, bypassing the HTTP layer.
    pub async fn insert_at(&self, timestamp: &str, total: f64) -> Result<i64, PosError> {
        let timestamp = timestamp.to_string();
        let conn = self.storage.database()?.connect().await?;
        conn.call(move |conn| {
            conn.execute(
                "INSERT INTO sales (cart_json, total, discount, name, op_number, timestamp)
                 VALUES ('[{\"item\":\"gauze\"}]', ?1, 0.0, 'Seed', 'OP-0', ?2)",
                rusqlite::params![total, timestamp],
            )?;
            Ok::<_, rusqlite::Error>(conn.last_insert_rowid())
        })
        .await
        .map_err(PosError::storage)
    }

    /// Number of rows in the ledger.
    pub async fn sale_count(&self) -> Result<i64, PosError> {
        let conn = self.storage.database()?.connect().await?;
        conn.call(|conn| conn.query_row("SELECT COUNT(*) FROM sales", [], |row| row.get(0)))
            .await
            .map_err(PosError::storage)
    }
}
