//! Flowline HTTP service
//!
//! Exposes the pipeline engine to the builder frontend: node palettes to
//! populate the canvas, the architecture endpoint that compiles a
//! submitted description, and the execution endpoints driving a compiled
//! pipeline with live values.
//!
//! Builds and executions are serialized behind one async mutex: the
//! engine assumes at most one of either in flight per pipeline, and the
//! lock is intentionally held across handler awaits to guarantee that.

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use pipeline_engine::{HandlerRegistry, PipelineStore};

/// Shared service state: the versioned pipeline store and the node
/// registry the builder resolves handlers from.
pub struct AppState {
    pub store: Mutex<PipelineStore>,
    pub registry: HandlerRegistry,
}

impl AppState {
    /// State backed by the built-in node vocabulary.
    pub fn new() -> Self {
        Self::with_registry(pipeline_nodes::builtin_registry())
    }

    /// State backed by a custom registry (embedding applications may
    /// extend or replace the built-in node set).
    pub fn with_registry(registry: HandlerRegistry) -> Self {
        Self {
            store: Mutex::new(PipelineStore::new()),
            registry,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble the service router.
///
/// CORS is permissive: the builder frontend is served from its own
/// origin during development.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::health))
        .nest("/api/v1", api::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr) -> std::io::Result<()> {
    let state = Arc::new(AppState::new());
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on http://{}", addr);
    axum::serve(listener, app).await
}
