//! # REST API
//!
//! JSON endpoints over the `TransferService`. This layer only translates:
//! it authenticates the caller, maps request bodies and query strings to
//! domain commands and criteria, and turns `BankError`s into status codes.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;

use crate::application::transfer_service::TransferService;
use crate::domain::principal::Credentials;
use crate::error::Result;
use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Upper bound for the `size` query parameter of searches.
    pub max_page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TransferService>,
    pub credentials: Arc<Credentials>,
    pub max_page_size: u32,
}

impl AppState {
    pub fn new(service: TransferService, credentials: Credentials, max_page_size: u32) -> Self {
        Self {
            service: Arc::new(service),
            credentials: Arc::new(credentials),
            max_page_size,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/transactions/transfer", post(handlers::transfer))
        .route("/transactions/search", get(handlers::search))
        .route("/accounts", get(handlers::accounts));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API until Ctrl-C is received.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
