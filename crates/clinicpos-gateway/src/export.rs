// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV rendering of ledger rows.

use clinicpos_core::{PosError, SaleRow};

/// Header row of the sales report.
pub const CSV_HEADER: [&str; 7] = [
    "ID",
    "Name",
    "OP Number",
    "Cart",
    "Total",
    "Discount",
    "Timestamp",
];

/// Attachment name offered to the browser.
pub const REPORT_FILE_NAME: &str = "sales_report.csv";

/// Render rows as CSV, header first. The cart column is the stored text, untouched.
pub fn render_csv(rows: &[SaleRow]) -> Result<Vec<u8>, PosError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for row in rows {
        writer
            .write_record([
                row.id.to_string(),
                row.name.clone().unwrap_or_default(),
                row.op_number.clone().unwrap_or_default(),
                row.cart_json.clone(),
                format_amount(row.total),
                format_amount(row.discount),
                row.timestamp.clone(),
            ])
            .map_err(csv_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| PosError::Internal(format!("failed to finish CSV report: {e}")))
}

/// Amounts keep a decimal point even when whole (`5.0`, not `5`).
fn format_amount(value: f64) -> String {
    format!("{value:?}")
}

fn csv_err(e: csv::Error) -> PosError {
    PosError::Internal(format!("failed to write CSV report: {e}"))
}
