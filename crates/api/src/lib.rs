//! # TeamSync API
//!
//! Read-only HTTP view over the scheduling engine: team listings, event
//! tallies and the health of the weekly prompt loop.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths
//! - **Handlers**: request processing against the shared [`SyncContext`]
//! - **Middleware**: error mapping to HTTP statuses
//! - **Config**: environment-driven server settings
//!
//! The server runs inside the bot process and never writes either document.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling middleware
pub mod middleware;
/// Route definitions
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::{Result, WrapErr};
use teamsync_engine::{StatusHandle, SyncContext};
use tokio::{net::TcpListener, sync::watch};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::middleware::error_handling::handle_layer_error;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Engine context; reads go through its bounded I/O helpers
    pub ctx: Arc<SyncContext>,
    /// Live status of the prompt loop
    pub status: StatusHandle,
}

/// Build the application router with every route and layer attached.
pub fn build_router(state: Arc<ApiState>, config: &config::ApiConfig) -> Result<Router> {
    let app = Router::new()
        .merge(routes::health::routes())
        .merge(routes::community::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .wrap_err_with(|| format!("Invalid CORS origin: {origin}"))
            })
            .collect::<Result<Vec<_>>>()?;

        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_origin(origins);

        app.layer(cors)
    } else {
        app
    };

    Ok(app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_layer_error))
            .timeout(Duration::from_secs(config.request_timeout)),
    ))
}

/// Serve the API until `shutdown` flips to true.
pub async fn start_server(
    config: config::ApiConfig,
    state: Arc<ApiState>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let app = build_router(state, &config)?;

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind API server to {addr}"))?;
    info!("Status API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        })
        .await?;

    info!("Status API stopped");
    Ok(())
}
