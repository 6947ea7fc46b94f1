// http-relay - buffering HTTP forwarding proxy with response interception and caching

use anyhow::Result;
use clap::Parser;
use http_relay::cli::Args;
use http_relay::config::AppConfig;
use http_relay::server::create_router;
use http_relay::utils::logging;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(listen) = &args.listen {
        let (host, port) = listen
            .rsplit_once(':')
            .ok_or_else(|| anyhow::anyhow!("--listen expects host:port, got '{listen}'"))?;
        config.server.host = host.to_string();
        config.server.port = port.parse()?;
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting http-relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Forwarding to upstream {}", config.relay.upstream);
    if config.relay.caching.enabled {
        info!("Response caching enabled, dir {}", config.relay.caching.dir);
    }

    // Phase 3: Build the forwarding pipeline and HTTP server
    let app = create_router(&config).await?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 4: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
