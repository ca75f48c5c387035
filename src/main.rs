//! Storefront HTTP server
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net::listener ──▶ http::server ──▶ routing::Dispatcher
//!                                        │                 │
//!                                        │ GET /           ├─ auth
//!                                        │ (greeting)      ├─ admin
//!                                        │                 ├─ product
//!                                        │ body parser     ├─ user
//!                                        │ (JSON → {})     └─ seller
//!                                        │                       │
//!                                        ▼                       ▼
//!                                 observability           db::ConnectionManager
//!                                 (logs, metrics)         (MongoDB, background)
//! ```
//!
//! Startup never waits on the database. A failed connection is logged and
//! the process keeps serving; a failed bind exits with status 1.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use storefront_server::config::load_from_env;
use storefront_server::db::MongoConnector;
use storefront_server::groups::default_groups;
use storefront_server::lifecycle::{spawn_signal_handler, start, Shutdown};
use storefront_server::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "storefront-server", version, about = "Storefront HTTP server")]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overriding PORT and the file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_from_env(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("storefront-server: configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("storefront-server: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %config.listener.bind_address(),
        database = %config.database.name,
        request_timeout_secs = config.timeouts.request_secs,
        "storefront-server starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    let server = match start(config, default_groups(), MongoConnector, &shutdown).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.wait().await {
        tracing::error!(error = %e, "Server stopped with error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
