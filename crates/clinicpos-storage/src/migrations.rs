// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned schema migrations, plus adoption of unversioned legacy ledgers.
//!
//! SQL files under `migrations/` are compiled in with `embed_migrations!` and
//! tracked by refinery in `refinery_schema_history`.
//!
//! A database written before migrations were versioned has a `sales` table
//! but no history table. Replaying `V2` against it would fail whenever the
//! legacy table already carries `name`/`op_number`, so such a table is moved
//! aside first, the migrations build a fresh `sales`, and the old rows are
//! copied in with their ids. The copy checks the legacy column list rather
//! than relying on failed `ALTER TABLE` statements. If the process stops
//! between the move and the copy, the next run finds the stashed table and
//! finishes the job.

use clinicpos_core::PosError;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

const LEDGER_TABLE: &str = "sales";
const STASH_TABLE: &str = "sales_unversioned";
const HISTORY_TABLE: &str = "refinery_schema_history";

/// What a migration run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Migrations applied by this run, as `V{version}__{name}`.
    pub applied: Vec<String>,
    /// Rows copied from a legacy unversioned table, if one was adopted.
    pub adopted_rows: Option<usize>,
}

/// Bring the schema up to date. Safe to call on every start.
pub fn run_migrations(conn: &mut Connection) -> Result<MigrationReport, PosError> {
    stash_unversioned_ledger(conn)?;

    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(PosError::storage)?;
    let applied = report
        .applied_migrations()
        .iter()
        .map(|m| {
            info!(version = m.version(), name = m.name(), "applied schema migration");
            format!("V{}__{}", m.version(), m.name())
        })
        .collect();

    let adopted_rows = adopt_stashed_ledger(conn).map_err(PosError::storage)?;
    Ok(MigrationReport {
        applied,
        adopted_rows,
    })
}

/// Move a legacy `sales` table out of the way of the versioned migrations.
fn stash_unversioned_ledger(conn: &Connection) -> Result<(), PosError> {
    let versioned = table_exists(conn, HISTORY_TABLE).map_err(PosError::storage)?;
    let has_ledger = table_exists(conn, LEDGER_TABLE).map_err(PosError::storage)?;
    if versioned || !has_ledger {
        return Ok(());
    }
    if table_exists(conn, STASH_TABLE).map_err(PosError::storage)? {
        return Err(PosError::storage(format!(
            "both `{LEDGER_TABLE}` and `{STASH_TABLE}` exist without migration history; \
             refusing to guess which one holds the ledger"
        )));
    }

    warn!("found a sales table without migration history, adopting it");
    conn.execute_batch(&format!(
        "ALTER TABLE {LEDGER_TABLE} RENAME TO {STASH_TABLE};"
    ))
    .map_err(PosError::storage)
}

/// Copy rows from the stashed legacy table into the versioned ledger, then drop it.
fn adopt_stashed_ledger(conn: &mut Connection) -> rusqlite::Result<Option<usize>> {
    if !table_exists(conn, STASH_TABLE)? {
        return Ok(None);
    }

    let columns = table_columns(conn, STASH_TABLE)?;
    let copy = format!(
        "INSERT INTO {LEDGER_TABLE} (id, cart_json, total, discount, timestamp, name, op_number)
         SELECT id, cart_json, {}, {}, timestamp, {}, {}
         FROM {STASH_TABLE} ORDER BY id",
        as_amount("total"),
        as_amount("discount"),
        carried(&columns, "name"),
        carried(&columns, "op_number"),
    );

    let tx = conn.transaction()?;
    let coerced = non_numeric_amount_ids(&tx)?;
    if !coerced.is_empty() {
        warn!(ids = ?coerced, "legacy sales with non-numeric amounts, stored as numbers");
    }
    let legacy_seq = sequence_of(&tx, STASH_TABLE)?;
    let copied = tx.execute(&copy, [])?;
    if let Some(seq) = legacy_seq {
        carry_sequence(&tx, seq)?;
    }
    tx.execute_batch(&format!("DROP TABLE {STASH_TABLE};"))?;
    tx.commit()?;

    info!(rows = copied, "adopted legacy sales ledger");
    Ok(Some(copied))
}

/// Amount column coerced to REAL. Text such as `''` becomes `0.0`, NULL becomes `0.0`.
fn as_amount(column: &str) -> String {
    format!("COALESCE(CAST({column} AS REAL), 0.0)")
}

/// Ids of legacy rows whose `total` or `discount` is not stored as a number.
fn non_numeric_amount_ids(conn: &Connection) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id FROM {STASH_TABLE}
         WHERE typeof(total) NOT IN ('real', 'integer')
            OR typeof(discount) NOT IN ('real', 'integer')
         ORDER BY id"
    ))?;
    let ids = stmt.query_map([], |row| row.get(0))?;
    ids.collect()
}

/// The AUTOINCREMENT high-water mark recorded for `table`, if any.
fn sequence_of(conn: &Connection, table: &str) -> rusqlite::Result<Option<i64>> {
    if !table_exists(conn, "sqlite_sequence")? {
        return Ok(None);
    }
    conn.query_row(
        "SELECT seq FROM sqlite_sequence WHERE name = ?1",
        [table],
        |row| row.get(0),
    )
    .optional()
}

/// Raise the ledger's AUTOINCREMENT counter to at least `seq`, so ids of
/// deleted legacy rows are never issued again.
fn carry_sequence(conn: &Connection, seq: i64) -> rusqlite::Result<()> {
    let updated = conn.execute(
        "UPDATE sqlite_sequence SET seq = MAX(seq, ?1) WHERE name = ?2",
        params![seq, LEDGER_TABLE],
    )?;
    if updated == 0 {
        conn.execute(
            "INSERT INTO sqlite_sequence (name, seq) VALUES (?1, ?2)",
            params![LEDGER_TABLE, seq],
        )?;
    }
    Ok(())
}

/// The column itself when the legacy table has it, otherwise a NULL literal.
fn carried<'a>(columns: &[String], column: &'a str) -> &'a str {
    if columns.iter().any(|c| c == column) {
        column
    } else {
        "NULL"
    }
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |row| row.get(0),
    )
}

pub(crate) fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    names.collect()
}
