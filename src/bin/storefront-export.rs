//! Static export: renders home, 404 and the first page of products into
//! the dist directory, serving catalog data from a temporary endpoint.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use storefront_render::catalog::Catalog;
use storefront_render::config::validation::validate_config;
use storefront_render::config::{load_or_default, AppConfig};
use storefront_render::export::{CatalogEndpoint, StaticExporter, StorefrontLoader};
use storefront_render::observability::logging;

#[derive(Parser)]
#[command(name = "storefront-export")]
#[command(about = "Pre-render storefront pages to static HTML", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory; must already hold the built `index.html` template.
    #[arg(short, long)]
    dist_dir: Option<PathBuf>,

    /// Maximum number of product pages.
    #[arg(short, long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("storefront-export: {e}");
            return ExitCode::FAILURE;
        }
    };
    apply_cli(&cli, &mut config);
    logging::init(&config.observability);

    run(config).await
}

fn apply_cli(cli: &Cli, config: &mut AppConfig) {
    if let Some(dist_dir) = &cli.dist_dir {
        config.export.dist_dir = dist_dir.clone();
    }
    if let Some(limit) = cli.limit {
        config.export.page_limit = limit;
    }
}

/// Validate the final config and run one export.
async fn run(config: AppConfig) -> ExitCode {
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(error = %error, "Invalid configuration");
        }
        return ExitCode::FAILURE;
    }

    match export(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Static export aborted");
            ExitCode::FAILURE
        }
    }
}

async fn export(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Arc::new(Catalog::load(&config.catalog.path).await?);
    let template_path = config.export.dist_dir.join("index.html");

    let exporter = StaticExporter::new(
        config.export.clone(),
        template_path,
        Arc::new(CatalogEndpoint::on_port(catalog, config.export.api_port)),
        Arc::new(StorefrontLoader::new(config.server.base.clone())),
    );
    exporter.run().await?;
    Ok(())
}
