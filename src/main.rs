use clap::Parser;
use std::sync::Arc;

use resource_server::config::{apply_bind_args, load_config, Cli, ServerConfig};
use resource_server::http::HttpServer;
use resource_server::lifecycle::{build_dispatcher, open_store, Shutdown};
use resource_server::{net, observability};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    apply_bind_args(&mut config.listener, &cli.bind);

    observability::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "resource-server starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = open_store(&config.storage)?;
    let dispatcher = Arc::new(build_dispatcher(&config, store));

    let listener = net::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let _signals = shutdown.listen_for_signals();

    let server = HttpServer::new(config, dispatcher);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
