//! `rapi` demo server.
//!
//! Serves the pages API under the configured prefix, `/health`, and an
//! optional static file directory.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rapi::config::{load_config, AppConfig};
use rapi::demo::{self, PageStore};
use rapi::observability::{logging, metrics};
use rapi::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "rapi", version, about = "REST routing demo server")]
struct Cli {
    /// TOML configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rapi starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_prefix = %config.api.prefix,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = demo::build_router(&config, PageStore::new());
    tracing::info!(
        exact_routes = router.exact_routes(),
        prefix_routes = router.prefix_routes(),
        "Routes registered"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();

    HttpServer::new(config, router)
        .run(listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
