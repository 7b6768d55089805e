// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checkout payload parsing and validation.
//!
//! The payload is parsed leniently (every field optional) so that a missing
//! field produces a validation message naming it instead of a generic
//! deserialization failure.

use serde::Deserialize;
use serde_json::Value;

use crate::error::PosError;
use crate::types::NewSale;

/// Raw checkout body as submitted by the till.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart: Option<Value>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub op_number: Option<String>,
}

impl CheckoutRequest {
    /// Parse a request body as JSON, whatever content type the client declared.
    pub fn from_slice(body: &[u8]) -> Result<Self, PosError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| PosError::validation(format!("request body is not valid JSON: {e}")))?;
        if !value.is_object() {
            return Err(PosError::validation("request body must be a JSON object"));
        }
        serde_json::from_value(value)
            .map_err(|e| PosError::validation(format!("invalid checkout payload: {e}")))
    }

    /// Check required fields and produce a sale ready for insertion.
    ///
    /// `name` and `op_number` are trimmed first. When `require_operator` is
    /// false they become optional and blank values are stored as null.
    pub fn validate(self, require_operator: bool) -> Result<NewSale, PosError> {
        let mut missing = Vec::new();

        let cart = match self.cart {
            Some(Value::Array(items)) if !items.is_empty() => Some(Value::Array(items)),
            Some(Value::Array(_)) | Some(Value::Null) | None => {
                missing.push("cart");
                None
            }
            Some(_) => {
                return Err(PosError::validation(
                    "field `cart` must be a list of line items",
                ));
            }
        };
        if self.total.is_none() {
            missing.push("total");
        }
        if self.discount.is_none() {
            missing.push("discount");
        }

        let name = non_blank(self.name);
        let op_number = non_blank(self.op_number);
        if require_operator {
            if name.is_none() {
                missing.push("name");
            }
            if op_number.is_none() {
                missing.push("op_number");
            }
        }

        match (cart, self.total, self.discount) {
            (Some(cart), Some(total), Some(discount)) if missing.is_empty() => Ok(NewSale {
                name,
                op_number,
                cart,
                total,
                discount,
            }),
            _ => Err(PosError::validation(format!(
                "missing or empty required field(s): {}",
                missing.join(", ")
            ))),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
