//! API surface under `/api/v1`

pub mod architecture;
pub mod execute;
pub mod palette;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use pipeline_engine::{BuildError, ExecuteError};

use crate::AppState;

/// Assemble the `/api/v1` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/integrations", get(integrations))
        .route("/inputs", get(palette::list_inputs))
        .route("/inputs/text", get(palette::text_input_node))
        .route("/inputs/file", get(palette::file_input_node))
        .route("/chat", get(palette::list_chats))
        .route("/chat/text-chat", get(palette::text_chat_node))
        .route("/chat/multimodal-chat", get(palette::multimodal_chat_node))
        .route("/llms", get(palette::list_llms))
        .route("/llms/openai", get(palette::openai_node))
        .route("/llms/ollama", get(palette::ollama_node))
        .route("/helpers", get(palette::list_helpers))
        .route("/helpers/system-prompt", get(palette::system_prompt_node))
        .route(
            "/helpers/chat-constructor",
            get(palette::chat_constructor_node),
        )
        .route("/outputs", get(palette::list_outputs))
        .route("/outputs/text", get(palette::text_output_node))
        .route("/architecture", post(architecture::update))
        .route("/execute", post(execute::run))
        .route("/chat/execute", post(execute::run_chat))
}

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
}

/// Perform a health check.
///
/// Container orchestration probes this endpoint; anything but 200 keeps
/// dependent services from deploying.
pub async fn health() -> Json<HealthCheck> {
    Json(HealthCheck { status: "OK" })
}

#[derive(Debug, Serialize)]
pub struct AvailableIntegrations {
    pub integrations: Vec<&'static str>,
}

/// List the integration categories the builder offers.
pub async fn integrations(State(_state): State<Arc<AppState>>) -> Json<AvailableIntegrations> {
    Json(AvailableIntegrations {
        integrations: vec!["Inputs", "LLMs", "Outputs"],
    })
}

/// Errors surfaced by the API, mapped onto HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    /// The submitted description was rejected; any previously compiled
    /// pipeline is still in place
    Build(BuildError),
    /// The execution terminated
    Execute(ExecuteError),
    /// Execution was requested before any description compiled
    NoPipeline,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Build(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ApiError::Execute(ExecuteError::Handler(message)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
            }
            ApiError::Execute(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ApiError::NoPipeline => (
                StatusCode::NOT_FOUND,
                "no pipeline has been compiled yet".to_string(),
            ),
        };
        log::warn!("request failed ({}): {}", status, message);
        (status, Json(json!({ "error": message }))).into_response()
    }
}
