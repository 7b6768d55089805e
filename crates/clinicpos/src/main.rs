// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Clinicpos - point-of-sale backend for a clinic.
//!
//! This is the binary entry point for the sales service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod migrate;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clinicpos_config::PosConfig;

/// Clinicpos - record, list and export clinic sales.
#[derive(Parser, Debug)]
#[command(name = "clinicpos", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the ledger and serve HTTP until interrupted (default).
    Serve,
    /// Bring the ledger schema up to date and exit.
    Migrate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Some(config) => config,
        None => std::process::exit(1),
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Migrate => migrate::run_migrate(config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Load and validate configuration, rendering diagnostics on failure.
fn load_config(path: Option<&std::path::Path>) -> Option<PosConfig> {
    let loaded = match path {
        Some(path) => clinicpos_config::load_and_validate_path(path),
        None => clinicpos_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => Some(config),
        Err(errors) => {
            clinicpos_config::render_errors(&errors);
            None
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides `log_level`.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "clinicpos={log_level},clinicpos_storage={log_level},clinicpos_gateway={log_level},tower_http={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
