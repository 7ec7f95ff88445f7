//! MCP Gateway
//!
//! A reverse proxy in front of a fleet of external MCP servers.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                MCP GATEWAY                    │
//!                    │                                               │
//!   Client Request   │  ┌─────────┐    ┌──────────┐                 │
//!   ─────────────────┼─▶│  http   │───▶│ routing  │── /notion ──────┼──▶ notion-mcp
//!                    │  │ server  │    │  table   │── /github ──────┼──▶ github-mcp
//!                    │  └────┬────┘    └──────────┘── /filesystem ──┼──▶ filesystem-mcp
//!                    │       │                     ── /analytics ───┼──▶ analytics-mcp
//!                    │       │ /health /services   ── /drive ───────┼──▶ drive-mcp
//!                    │       ▼                                      │
//!                    │  introspection (answered locally)            │
//!                    │                                               │
//!                    │  ┌────────────────────────────────────────┐  │
//!                    │  │         Cross-Cutting Concerns          │  │
//!                    │  │  config (env)  lifecycle  observability │  │
//!                    │  └────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! The route table is built once from the environment at startup and never
//! mutated. Upstream failures are converted to a generic 500; unmatched
//! paths get a 404 listing the available mounts.

use tokio::net::TcpListener;

use mcp_gateway::config;
use mcp_gateway::http::HttpServer;
use mcp_gateway::lifecycle::{signals, Shutdown};
use mcp_gateway::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!("mcp-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    // Load configuration from the environment. Missing upstream variables
    // fall back to documented defaults and are reported at WARN.
    let config = config::load_from_env()?;

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        services = config.services.len(),
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind the listening socket.
    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // SIGINT/SIGTERM both trigger shutdown.
    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        tracing::info!("Termination signal received");
        shutdown.trigger();
    });

    let server = HttpServer::new(config);
    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
