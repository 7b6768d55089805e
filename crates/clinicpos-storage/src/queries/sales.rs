// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append and list operations on the `sales` table.

use clinicpos_core::{NewSale, PosError, SaleFilter, SaleRow};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

const SELECT_COLUMNS: &str =
    "SELECT id, name, op_number, cart_json, total, discount, timestamp FROM sales";

/// Append one sale. The store assigns `id` and `timestamp`; the new id is returned.
pub async fn insert_sale(db: &Database, sale: &NewSale) -> Result<i64, PosError> {
    let cart_json = sale.cart_json()?;
    let sale = sale.clone();
    let conn = db.connect().await?;
    conn.call(move |conn| {
        conn.execute(
            "INSERT INTO sales (cart_json, total, discount, name, op_number)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![cart_json, sale.total, sale.discount, sale.name, sale.op_number],
        )?;
        Ok(conn.last_insert_rowid())
    })
    .await
    .map_err(map_tr_err)
}

/// List sales matching `filter`, newest first.
pub async fn list_sales(db: &Database, filter: &SaleFilter) -> Result<Vec<SaleRow>, PosError> {
    let (where_clause, args) = filter_clause(filter);
    let sql = format!("{SELECT_COLUMNS}{where_clause} ORDER BY id DESC");
    let conn = db.connect().await?;
    conn.call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |row| {
            Ok(SaleRow {
                id: row.get(0)?,
                name: row.get(1)?,
                op_number: row.get(2)?,
                cart_json: row.get(3)?,
                total: row.get(4)?,
                discount: row.get(5)?,
                timestamp: row.get(6)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()
    })
    .await
    .map_err(map_tr_err)
}

/// Build the `WHERE` clause and its positional arguments.
///
/// Each filter truncates `timestamp` to its own granularity; they are ANDed.
fn filter_clause(filter: &SaleFilter) -> (String, Vec<String>) {
    let candidates = [
        ("date(timestamp)", filter.date_key()),
        ("strftime('%m', timestamp)", filter.month_key()),
        ("strftime('%Y', timestamp)", filter.year_key()),
    ];

    let mut conditions = Vec::new();
    let mut args = Vec::new();
    for (expr, value) in candidates {
        if let Some(value) = value {
            args.push(value);
            conditions.push(format!("{expr} = ?{}", args.len()));
        }
    }

    if conditions.is_empty() {
        (String::new(), args)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), args)
    }
}
