//! HTTP handlers and router

pub mod health;
pub mod import;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::services::store::PersonStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn PersonStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn PersonStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::handle_health))
        .route("/api/people/import", post(import::handle_people_import))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped
pub async fn start_server(state: AppState) -> Result<()> {
    let bind_addr = state.config.bind_addr.clone();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    info!(
        "Listening on {} (person store: {})",
        bind_addr,
        state.store.name()
    );

    axum::serve(listener, build_router(state))
        .await
        .context("HTTP server error")?;

    Ok(())
}
