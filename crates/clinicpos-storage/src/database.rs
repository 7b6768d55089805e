// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle: where the ledger lives and how connections to it are made.
//!
//! Every operation opens its own connection through `tokio-rusqlite` and
//! drops it when done, so no connection state is shared between requests.
//! SQLite serializes concurrent writers at the file level; the busy timeout
//! makes a second writer wait for the lock instead of failing at once.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clinicpos_config::StorageConfig;
use clinicpos_core::PosError;
use tracing::debug;

use crate::migrations::{self, MigrationReport};

/// Location and connection settings of the SQLite ledger file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Database {
    /// Describe the database without touching the file.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            path: PathBuf::from(&config.database_path),
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
        }
    }

    /// Describe the database at `path` with the default busy timeout.
    pub fn at_path(path: impl AsRef<Path>) -> Self {
        Self::new(&StorageConfig {
            database_path: path.as_ref().display().to_string(),
            ..StorageConfig::default()
        })
    }

    /// Open the database, creating the file if needed, and bring its schema up to date.
    pub async fn open(config: &StorageConfig) -> Result<Self, PosError> {
        let db = Self::new(config);
        db.migrate().await?;
        Ok(db)
    }

    /// Path of the SQLite file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection with the busy timeout applied.
    ///
    /// The connection closes when dropped.
    pub async fn connect(&self) -> Result<tokio_rusqlite::Connection, PosError> {
        let conn = tokio_rusqlite::Connection::open(&self.path)
            .await
            .map_err(PosError::storage)?;
        let timeout = self.busy_timeout;
        conn.call(move |conn| conn.busy_timeout(timeout))
            .await
            .map_err(map_tr_err)?;
        Ok(conn)
    }

    /// Run the schema initializer. Idempotent.
    pub async fn migrate(&self) -> Result<MigrationReport, PosError> {
        let conn = self.connect().await?;
        let report = conn
            .call(|conn| Ok::<_, rusqlite::Error>(migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)??;
        debug!(path = %self.path.display(), "sales ledger schema is current");
        Ok(report)
    }
}

/// Convert a tokio-rusqlite error into [`PosError::Storage`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> PosError {
    match e {
        tokio_rusqlite::Error::Error(inner) => PosError::storage(inner),
        other => PosError::storage(other),
    }
}
