//! Storefront live server.
//!
//! Serves the catalog data API under `/api` and renders every other path
//! server-side through the configured render provider.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use storefront_render::app::StorefrontRenderer;
use storefront_render::catalog::Catalog;
use storefront_render::config::load_or_default;
use storefront_render::http::HttpServer;
use storefront_render::lifecycle::{signals, Shutdown};
use storefront_render::observability::logging;
use storefront_render::render::provider_for;

#[derive(Parser)]
#[command(name = "storefront-server")]
#[command(about = "Server-side rendering storefront", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!("storefront-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        base = %config.server.base,
        mode = ?config.server.mode,
        "Configuration loaded"
    );

    let catalog = Arc::new(Catalog::load(&config.catalog.path).await?);

    let renderer = StorefrontRenderer::new(&config.server.base, catalog.clone())?;
    let provider = provider_for(config.server.mode, &config.render, Arc::new(renderer));

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let server = HttpServer::new(&config.server, provider, catalog);
    let shutdown = Shutdown::new();
    let signal = shutdown.signal();
    tokio::spawn(async move {
        signals::ctrl_c().await;
        shutdown.trigger();
    });
    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
