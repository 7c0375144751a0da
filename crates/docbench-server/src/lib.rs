//! HTTP surface and process bootstrap for the docbench server.
//!
//! The store is connected before any listener is bound; a failed connection
//! stops startup. The connected store is shared by every request through
//! [`AppState`] and closed once after the server drains.

use axum::{
    Router,
    routing::{get, post},
};
use docbench_config::{DocbenchConfig, ServerConfig};
use docbench_store::{RecordStore, StoreError, connect};
use log::{error, info};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub mod error;
pub mod handlers;
pub mod models;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub settings: ServerConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, settings: ServerConfig) -> Self {
        Self { store, settings }
    }
}

/// Errors that stop the server process.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The store could not be reached at startup.
    #[error("failed to connect to store: {0}")]
    Connect(#[source] StoreError),
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// The accept loop failed.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
    /// Releasing the store at shutdown failed.
    #[error("failed to close store: {0}")]
    Close(#[source] StoreError),
}

/// Create the router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::page::index))
        .route("/health", get(handlers::page::health))
        .route("/insert", post(handlers::records::insert_batch))
        .route(
            "/records",
            get(handlers::records::list_records).delete(handlers::records::delete_records),
        )
        .route("/stats", get(handlers::stats::get_stats))
        .with_state(state)
}

/// Connect to the configured store, then serve until Ctrl-C.
pub async fn serve(config: &DocbenchConfig) -> Result<(), ServerError> {
    let store = connect(&config.store).map_err(|err| {
        error!("store connection failed; not starting server: {err}");
        ServerError::Connect(err)
    })?;
    run(store, config.server.clone(), shutdown_signal()).await
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn run(
    store: Arc<dyn RecordStore>,
    settings: ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let addr = settings.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(source) => {
            error!("failed to bind {addr}: {source}");
            store.close().await.map_err(ServerError::Close)?;
            return Err(ServerError::Bind { addr, source });
        }
    };
    serve_listener(listener, store, settings, shutdown).await
}

/// Serve on an already-bound listener, closing the store once the server
/// has drained.
pub async fn serve_listener(
    listener: TcpListener,
    store: Arc<dyn RecordStore>,
    settings: ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        info!("server listening on http://{addr}");
    }
    let router = create_router(AppState::new(store.clone(), settings));
    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await;
    info!("server stopped; closing store");
    store.close().await.map_err(ServerError::Close)?;
    served.map_err(ServerError::Serve)
}

/// Resolve on Ctrl-C. Never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!("failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}
