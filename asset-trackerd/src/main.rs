mod api;
mod config;
mod store;
mod store_manager;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use anyhow::{Context, Result};
use crate::config::Config;
use crate::store::db::AssetDb;
use crate::store_manager::StoreHandle;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("asset_trackerd=info,tower_http=info"))
        )
        .init();

    tracing::info!("Starting asset-trackerd");

    // Load config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/asset-tracker/trackerd.toml".to_string());

    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    tracing::info!("Loaded config from {}", config_path);

    let scheme = config.asset_id.scheme()?;

    // Open SQLite database
    let db = AssetDb::open(&config.store.db_path)?;
    tracing::info!("Opened database at {:?}", config.store.db_path);

    // Compute initial hash
    let initial_assets = db.list_assets()?;
    let initial_hash = store::hash::compute_hash(&initial_assets);
    tracing::info!(assets = initial_assets.len(), "Initial collection hash: {}", initial_hash);

    let (hash_tx, hash_rx) = watch::channel(initial_hash);

    // Start store thread
    let store = StoreHandle::spawn(db, scheme, hash_tx);

    // Build API router
    let app_state = api::routes::AppState {
        store: store.clone(),
        hash_rx,
    };
    let mut app = api::routes::router(app_state).layer(TraceLayer::new_for_http());
    if !config.api.cors_origins.is_empty() {
        app = app.layer(api::routes::cors_layer(&config.api.cors_origins)?);
        tracing::info!("CORS enabled for {:?}", config.api.cors_origins);
    }

    // Bind HTTP server
    let listener = tokio::net::TcpListener::bind(&config.api.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.api.listen))?;

    tracing::info!("API listening on {}", config.api.listen);

    // Run server with graceful shutdown
    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutdown signal received");

    cancel.cancel();
    let _ = server_handle.await;

    // Shutdown store thread once no handler can reach it
    if let Err(e) = store.shutdown().await {
        tracing::error!("Failed to shutdown store: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
