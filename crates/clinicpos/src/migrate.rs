// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `clinicpos migrate`: bring the ledger schema up to date and exit.

use clinicpos_config::PosConfig;
use clinicpos_core::PosError;
use clinicpos_storage::{Database, MigrationReport};

/// Runs the `clinicpos migrate` command and prints a summary.
pub async fn run_migrate(config: PosConfig) -> Result<(), PosError> {
    crate::init_tracing(&config.server.log_level);

    let report = Database::new(&config.storage).migrate().await?;
    println!("{}", summarize(&config.storage.database_path, &report));
    Ok(())
}

fn summarize(path: &str, report: &MigrationReport) -> String {
    let mut lines = Vec::new();
    if report.applied.is_empty() {
        lines.push(format!("{path}: schema is up to date"));
    } else {
        lines.push(format!("{path}: applied {}", report.applied.join(", ")));
    }
    if let Some(rows) = report.adopted_rows {
        lines.push(format!("{path}: adopted {rows} legacy sale(s)"));
    }
    lines.join("\n")
}
