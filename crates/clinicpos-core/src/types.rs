// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sale ledger types shared across the store trait and the HTTP gateway.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PosError;

/// Health status reported by store health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The store answered a probe query.
    Healthy,
    /// The store is not usable.
    Unhealthy(String),
}

/// A validated sale ready to be appended to the ledger.
///
/// `id` and `timestamp` are absent on purpose: the store assigns both.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub name: Option<String>,
    pub op_number: Option<String>,
    /// Client-supplied cart, kept as an opaque JSON value.
    pub cart: Value,
    pub total: f64,
    pub discount: f64,
}

impl NewSale {
    /// Serialize the cart to the compact text form stored in `cart_json`.
    pub fn cart_json(&self) -> Result<String, PosError> {
        serde_json::to_string(&self.cart)
            .map_err(|e| PosError::Internal(format!("failed to serialize cart: {e}")))
    }
}

/// A ledger row exactly as stored, with the cart still in its serialized form.
///
/// CSV export writes `cart_json` verbatim; JSON listings go through
/// [`SaleRow::into_sale`] to re-parse it.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRow {
    pub id: i64,
    /// Null for rows written before the column existed.
    pub name: Option<String>,
    /// Null for rows written before the column existed.
    pub op_number: Option<String>,
    pub cart_json: String,
    pub total: f64,
    pub discount: f64,
    /// Store-assigned creation time, `YYYY-MM-DD HH:MM:SS` in UTC.
    pub timestamp: String,
}

impl SaleRow {
    /// Parse the stored cart back into its original structure.
    pub fn into_sale(self) -> Result<Sale, PosError> {
        let cart = serde_json::from_str(&self.cart_json).map_err(|e| {
            PosError::Internal(format!("sale {} has an unreadable cart: {e}", self.id))
        })?;
        Ok(Sale {
            id: self.id,
            name: self.name,
            op_number: self.op_number,
            cart,
            total: self.total,
            discount: self.discount,
            timestamp: self.timestamp,
        })
    }
}

/// A sale as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub name: Option<String>,
    pub op_number: Option<String>,
    pub cart: Value,
    pub total: f64,
    pub discount: f64,
    pub timestamp: String,
}
