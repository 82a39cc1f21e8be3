//! main-api gateway
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!                     │                   MAIN-API                     │
//!   Client Request    │  ┌──────────┐   ┌──────────┐   ┌───────────┐  │
//!   ──────────────────┼─▶│ metrics  │──▶│  route   │──▶│ auxiliary │──┼──▶ Auxiliary
//!                     │  │middleware│   │ handler  │   │  client   │  │    Service
//!                     │  └──────────┘   └────┬─────┘   └───────────┘  │
//!                     │                      │ versions + timestamp    │
//!   Client Response   │                      ▼                         │
//!   ◀─────────────────┼────────────── response envelope                │
//!                     │                                                │
//!                     │  config · logging · /metrics · lifecycle       │
//!                     └───────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;

use main_api::config::{load_config, load_env_file, ConfigError};
use main_api::lifecycle::{wait_for_termination, Shutdown};
use main_api::observability::logging::init_logging;
use main_api::GatewayServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_file = load_env_file();
    let config = match load_config(std::env::args_os()) {
        Ok(config) => config,
        // --help and usage errors print and exit the way clap does
        Err(ConfigError::Parse(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };
    init_logging(&config.observability);

    tracing::info!("main-api v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &env_file {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        service_version = %config.service.version,
        auxiliary_service_url = %config.auxiliary.base_url,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Main API service listening"
    );

    let shutdown = Shutdown::new();
    let server = GatewayServer::new(config)?;
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        reason = wait_for_termination() => {
            let reason = reason?;
            tracing::info!(signal = %reason, "Shutting down");
            shutdown.trigger(reason);
            server_task.await??;
        }
        result = &mut server_task => {
            result??;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
