//! sitepdf preview - Serve a static site with the shared navigation injected.

mod helpers;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, header},
    routing::get,
};
use clap::Parser;
use sitepdf_core::ExportConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "sitepdf-preview")]
#[command(author, version, about = "Preview a static site with navigation injected", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "4000")]
    port: u16,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site root directory
    #[arg(short, long, env = "SITEPDF_SITE_DIR")]
    site: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},tower_http=debug")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        ExportConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        ExportConfig::load()
    };
    if let Some(site) = args.site {
        config.site_dir = site;
    }

    let state = Arc::new(AppState::new(&config).context("Failed to initialize application state")?);
    let assets = ServeDir::new(&state.site_dir);

    let app = Router::new()
        .route("/", get(routes::index))
        .route("/{name}", get(routes::site_file))
        // Nested assets (css, js, images) straight from disk
        .fallback_service(assets)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Always revalidate so edits show up on reload
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-cache"),
                )),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Serving {} at http://{}", config.site_dir.display(), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
