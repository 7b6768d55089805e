// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `clinicpos serve`: initialize the ledger, then serve HTTP until a shutdown signal.

use std::sync::Arc;

use clinicpos_config::PosConfig;
use clinicpos_core::{PosError, SalesStore};
use clinicpos_gateway::{AppState, ServerConfig};
use clinicpos_storage::SqliteStorage;
use tracing::{info, warn};

/// Runs the `clinicpos serve` command.
///
/// The schema initializer runs before the listener binds; a failure in
/// either aborts startup.
pub async fn run_serve(config: PosConfig) -> Result<(), PosError> {
    crate::init_tracing(&config.server.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "starting clinicpos serve");

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize_with_report().await?;
    let store: Arc<dyn SalesStore> = Arc::new(storage);

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        permissive_cors: config.server.permissive_cors,
    };
    let listener = clinicpos_gateway::bind(&server_config).await?;

    let state = AppState::new(store, config.checkout.require_operator);
    let app = clinicpos_gateway::router(state, server_config.permissive_cors);

    clinicpos_gateway::serve(listener, app, shutdown_signal()).await?;

    info!("clinicpos serve shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                    _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                ctrl_c.await;
                info!("received SIGINT (Ctrl+C), initiating shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("received Ctrl+C, initiating shutdown");
    }
}
