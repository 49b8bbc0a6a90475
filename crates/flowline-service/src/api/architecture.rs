//! Architecture endpoint: compile a submitted description
//!
//! The frontend posts the full node/edge description on every canvas
//! change; the store skips the rebuild when nothing structurally
//! changed. A rejected description returns 422 and leaves the previous
//! compiled pipeline serving executions.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use pipeline_engine::{PipelineDescription, PipelineMode, StoreUpdate};

use crate::api::ApiError;
use crate::AppState;

/// Outcome of an architecture update.
#[derive(Debug, Serialize)]
pub struct ArchitectureResponse {
    /// "rebuilt" or "unchanged"
    pub status: &'static str,
    /// Store version after the update
    pub version: u64,
    /// Execution mode of the compiled pipeline
    pub mode: PipelineMode,
    /// Whether every submitted node shares one connected component
    pub connected: bool,
    /// Number of compiled node records
    pub node_count: usize,
}

/// Accept a description and rebuild the pipeline if it changed.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Json(description): Json<PipelineDescription>,
) -> Result<Json<ArchitectureResponse>, ApiError> {
    let mut store = state.store.lock().await;
    let outcome = store
        .update(description, &state.registry)
        .map_err(ApiError::Build)?;

    let status = match outcome {
        StoreUpdate::Unchanged { .. } => "unchanged",
        StoreUpdate::Rebuilt { .. } => "rebuilt",
    };
    let (mode, connected, node_count) = match store.pipeline() {
        Some(pipeline) => (pipeline.mode, pipeline.connected, pipeline.len()),
        None => (PipelineMode::Standard, true, 0),
    };

    Ok(Json(ArchitectureResponse {
        status,
        version: outcome.version(),
        mode,
        connected,
        node_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(AppState::new()))
    }

    fn chat_description() -> PipelineDescription {
        serde_json::from_value(json!({
            "Nodes": [
                {"Id": 1, "Name": "Text-Only Chat", "Items": []},
                {"Id": 2, "Name": "System Prompt", "Items": [
                    {"Type": "Prompt", "Value": "You are terse."}
                ]}
            ],
            "Edges": [
                {"Type": "Normal", "Source": 1, "Target": 2}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_update_compiles_and_reports_mode() {
        let state = state();
        let response = update(state, Json(chat_description())).await.unwrap();
        assert_eq!(response.0.status, "rebuilt");
        assert_eq!(response.0.version, 1);
        assert_eq!(response.0.mode, PipelineMode::Chat);
        assert_eq!(response.0.node_count, 1);
    }

    #[tokio::test]
    async fn test_resubmission_is_unchanged() {
        let shared = Arc::new(AppState::new());
        update(State(Arc::clone(&shared)), Json(chat_description()))
            .await
            .unwrap();
        let response = update(State(shared), Json(chat_description()))
            .await
            .unwrap();
        assert_eq!(response.0.status, "unchanged");
        assert_eq!(response.0.version, 1);
    }

    #[tokio::test]
    async fn test_rejected_description_keeps_previous_pipeline() {
        let shared = Arc::new(AppState::new());
        update(State(Arc::clone(&shared)), Json(chat_description()))
            .await
            .unwrap();

        let mut broken = chat_description();
        broken.edges[0].target = 7;
        let err = update(State(Arc::clone(&shared)), Json(broken)).await;
        assert!(err.is_err());

        let store = shared.store.lock().await;
        assert_eq!(store.version(), 1);
        assert!(store.pipeline().is_some());
    }
}
