// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum: routes, middleware and shared state.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use axum::{routing::get, Router};
use clinicpos_core::{PosError, SalesStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for request handlers.
///
/// Holds no per-request data: each handler call reaches the store on its own.
#[derive(Clone)]
pub struct AppState {
    /// The sales ledger.
    pub store: Arc<dyn SalesStore>,
    /// Whether checkout requires `name` and `op_number`.
    pub require_operator: bool,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn SalesStore>, require_operator: bool) -> Self {
        Self {
            store,
            require_operator,
            start_time: Instant::now(),
        }
    }
}

/// Listener settings (mirrors `ServerConfig` from clinicpos-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Add a permissive CORS layer.
    pub permissive_cors: bool,
}

/// Build the application router.
pub fn router(state: AppState, permissive_cors: bool) -> Router {
    let app = Router::new()
        .route("/", get(handlers::home))
        .route(
            "/checkout",
            get(handlers::checkout_info).post(handlers::checkout),
        )
        .route("/sales", get(handlers::list_sales))
        .route("/export_csv", get(handlers::export_csv))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if permissive_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Bind the listener. Done before serving so bind failures abort startup.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, PosError> {
    let addr = match config.host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, config.port).to_string(),
        Err(_) => format!("{}:{}", config.host, config.port),
    };
    TcpListener::bind(&addr)
        .await
        .map_err(|e| PosError::Internal(format!("failed to bind {addr}: {e}")))
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), PosError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "sales service listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| PosError::Internal(format!("server error: {e}")))
}
