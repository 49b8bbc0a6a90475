//! Execution endpoints
//!
//! Drive the compiled pipeline with live values. The store lock is held
//! for the whole execution, including remote model calls, so at most one
//! execution (or build) runs at a time.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pipeline_engine::DISCONNECTED_MESSAGE;

use crate::api::ApiError;
use crate::AppState;

/// Standard execution request: the live argument vector, in the order
/// the builder enumerated the rendered input elements (the reserved
/// leading element excluded).
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub args: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub result: Value,
}

/// Execute the compiled pipeline against live arguments.
pub async fn run(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let store = state.store.lock().await;
    let pipeline = store.pipeline().ok_or(ApiError::NoPipeline)?;
    let result = pipeline_engine::execute(pipeline, &request.args)
        .await
        .map_err(ApiError::Execute)?;
    Ok(Json(ExecuteResponse { result }))
}

/// Chat execution request. `elements` enumerates the rendered element
/// values in builder order, starting with the chat surface itself.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Value,
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub elements: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Execute in chat mode and return the folded display string.
///
/// An empty store behaves like an empty pipeline: the fixed advisory
/// comes back instead of an error.
pub async fn run_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let store = state.store.lock().await;
    let Some(pipeline) = store.pipeline() else {
        return Ok(Json(ChatResponse {
            response: DISCONNECTED_MESSAGE.to_string(),
        }));
    };

    let mut chat_args = vec![request.message, Value::Array(request.history)];
    chat_args.extend(request.elements);
    let response = pipeline_engine::execute_chat(pipeline, &chat_args)
        .await
        .map_err(ApiError::Execute)?;
    Ok(Json(ChatResponse { response }))
}
