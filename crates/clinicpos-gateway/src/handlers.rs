// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the sales service.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use clinicpos_core::{
    CheckoutRequest, FilterParams, HealthStatus, PosError, Sale, SaleFilter, SaleRow,
};
use serde::Serialize;

use crate::error::{ApiError, StatusResponse};
use crate::export::{render_csv, REPORT_FILE_NAME};
use crate::server::AppState;

const HOME_PAGE: &str = "<h1>Clinic POS</h1>\
<ul>\
<li><code>POST /checkout</code> record a sale</li>\
<li><code>GET /sales?date=YYYY-MM-DD&amp;month=MM&amp;year=YYYY</code> list sales</li>\
<li><code>GET /export_csv</code> download the same list as CSV</li>\
</ul>";

const CHECKOUT_HINT: &str = "<p>Send a <code>POST</code> request with a JSON body \
containing <code>cart</code>, <code>total</code>, <code>discount</code>, \
<code>name</code> and <code>op_number</code>.</p>";

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` or `unavailable`.
    pub status: &'static str,
    /// Binary version.
    pub version: &'static str,
    /// Seconds since the service started.
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// GET /
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// GET /checkout
pub async fn checkout_info() -> Html<&'static str> {
    Html(CHECKOUT_HINT)
}

/// POST /checkout
///
/// The body is read as JSON whatever the declared content type.
pub async fn checkout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let sale = CheckoutRequest::from_slice(&body)?.validate(state.require_operator)?;
    let sale_id = state.store.record_sale(&sale).await?;
    tracing::info!(sale_id, total = sale.total, "sale recorded");
    Ok(Json(StatusResponse::success()))
}

/// GET /sales
pub async fn list_sales(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let rows = filtered_rows(&state, params).await?;
    let sales = rows
        .into_iter()
        .map(SaleRow::into_sale)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(sales))
}

/// GET /export_csv
pub async fn export_csv(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let rows = filtered_rows(&state, params).await?;
    let body = render_csv(&rows)?;
    let disposition = format!("attachment; filename={REPORT_FILE_NAME}");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// GET /health
///
/// 200 when the store answers a probe, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let detail = match state.store.health_check().await {
        Ok(HealthStatus::Healthy) => None,
        Ok(HealthStatus::Unhealthy(reason)) => Some(reason),
        Err(e) => Some(e.to_string()),
    };
    if let Some(reason) = &detail {
        tracing::error!(store = state.store.name(), %reason, "health probe failed");
    }
    let (code, status) = match detail {
        None => (StatusCode::OK, "ok"),
        Some(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
    };
    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: state.start_time.elapsed().as_secs(),
            detail,
        }),
    )
}

async fn filtered_rows(
    state: &AppState,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Vec<SaleRow>, PosError> {
    let Query(params) =
        params.map_err(|e| PosError::validation(format!("invalid query string: {e}")))?;
    let filter = SaleFilter::parse(&params)?;
    let rows = state.store.list_sales(&filter).await?;
    tracing::debug!(?filter, rows = rows.len(), "sales listed");
    Ok(rows)
}
