//! Slicer proxy (v1)
//!
//! Exposes the slicer UI API under a path prefix and relays it to the
//! slicer service.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                SLICER PROXY                  │
//!                       │                                              │
//!     Browser UI        │  ┌─────────┐    ┌─────────┐    ┌──────────┐  │
//!     ──────────────────┼─▶│  http   │───▶│   api   │───▶│ backend  │──┼──▶ Slicer
//!                       │  │ server  │    │handlers │    │ clients  │  │    service
//!                       │  └─────────┘    └────┬────┘    └──────────┘  │
//!                       │                      │                       │
//!                       │                      ▼                       │
//!                       │                ┌──────────┐                  │
//!                       │                │  output  │──────────────────┼──▶ gcodes/
//!                       │                └──────────┘                  │
//!                       │                                              │
//!                       │  config · observability · lifecycle          │
//!                       └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use slicer_proxy::config::{load_config, ProxyConfig};
use slicer_proxy::lifecycle::signals::shutdown_on_signal;
use slicer_proxy::observability::{logging, metrics};
use slicer_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "slicer-proxy")]
#[command(about = "REST proxy between the slicer UI and the slicer service", long_about = None)]
struct Args {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `backend.base_url`.
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(url) = args.backend_url {
        config.backend.base_url = url;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("slicer-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        gcodes_dir = %config.output.gcodes_dir().display(),
        request_timeout_secs = config.backend.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signal = shutdown.signal();
    tokio::spawn(async move {
        shutdown_on_signal(&shutdown).await;
    });

    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
