//! phub-api - Property Consolidation Microservice
//!
//! Reconciles the scraped JSON payloads of one property across the primary
//! source and two secondary listing sources, serving the merged canonical
//! record plus per-source agreement scores over HTTP.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use phub_api::dataset::fs_store::FsPropertyStore;
use phub_api::AppState;
use phub_common::config::Settings;

/// Command-line options
#[derive(Debug, Parser)]
#[command(name = "phub-api", version, about = "Property consolidation service")]
struct Cli {
    /// Directory holding scraped property data (overrides PHUB_DATA_ROOT)
    #[arg(long)]
    data_root: Option<String>,

    /// HTTP listen port (overrides PHUB_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting phub-api (Property Consolidation) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::resolve(cli.data_root.as_deref(), cli.port)?;
    info!("Data root: {}", settings.data_root.display());

    let store = Arc::new(FsPropertyStore::new(settings.data_root));
    let state = AppState::new(store);
    let app = phub_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", settings.port)).await?;
    info!("Listening on http://127.0.0.1:{}", settings.port);
    info!("Health check: http://127.0.0.1:{}/health", settings.port);

    axum::serve(listener, app).await?;

    Ok(())
}
