//! Plattenbox backend - service entry point
//!
//! Boot order: config, tracing, album list + slot map, router, serve.
//! The track catalog loads in the background after the server is up, so
//! the gallery appears immediately and search reports "pending" until
//! the catalog arrives.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use parking_lot::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plattenbox::catalog::{self, CatalogState};
use plattenbox::config::Config;
use plattenbox::slots::SlotMap;
use plattenbox::{AppState, api};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plattenbox=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Plattenbox backend");

    // The slot map needs the full album list before any request is served
    let albums = Arc::new(catalog::load_albums(&config.albums_path)?);
    let slot_map = Arc::new(SlotMap::build(&albums, config.overflow_policy)?);
    tracing::info!(albums = albums.len(), "Slot map built");

    // The track catalog is larger and only search needs it; load it in
    // the background and flip the state cell when done
    let catalog_cell = Arc::new(RwLock::new(CatalogState::Pending));
    tokio::spawn(load_catalog(
        config.catalog_path.clone(),
        catalog_cell.clone(),
    ));

    let state = AppState {
        config: config.clone(),
        albums,
        slot_map,
        catalog: catalog_cell,
    };

    let app = Router::new()
        .merge(api::health::router())
        .nest("/api", api::gallery::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.bind_addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load the track catalog and publish it into the shared state cell.
///
/// A failed load publishes an empty catalog: search then degrades to
/// "no match" instead of reporting "pending" forever.
async fn load_catalog(path: PathBuf, cell: Arc<RwLock<CatalogState>>) {
    match catalog::load_songs(&path).await {
        Ok(entries) => {
            tracing::info!(entries = entries.len(), "Track catalog loaded");
            *cell.write() = CatalogState::Ready(entries);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load track catalog - search will find nothing");
            *cell.write() = CatalogState::Ready(Vec::new());
        }
    }
}
