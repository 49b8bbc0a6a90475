//! Ollama generate node
//!
//! Sends the incoming prompt to a local Ollama server. The base URL is
//! itself a configuration slot, so a pipeline can point different nodes
//! at different servers (or drive the URL live through an override).

use async_trait::async_trait;
use pipeline_engine::{ConfigItem, ExecuteError, NodeHandler};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::args::{arg_f64, arg_str, prompt_text, require_str};
use crate::palette::{HandleSpec, PaletteItem, PaletteNode, SliderSpec, TextDisplaySpec, TextSpec};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Handler calling an Ollama `/api/generate` endpoint.
pub struct OllamaHandler {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaHandler {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Change the fallback server URL used when the node's "Base URL"
    /// slot is empty.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for OllamaHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn request_body(model: &str, temperature: Option<f64>, prompt: &str) -> Value {
    let mut body = json!({
        "model": model,
        "prompt": prompt,
        "stream": false
    });
    if let Some(temperature) = temperature {
        body["options"] = json!({ "temperature": temperature });
    }
    body
}

#[async_trait]
impl NodeHandler for OllamaHandler {
    async fn call(&self, data: Value, args: &[ConfigItem]) -> Result<Value, ExecuteError> {
        let model = require_str(args, "Model")?;
        let temperature = arg_f64(args, "Temperature");
        let base_url = arg_str(args, "Base URL")
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.base_url.clone());
        let prompt = prompt_text(&data);

        let url = format!("{}/api/generate", base_url.trim_end_matches('/'));
        log::debug!("Ollama LLM: requesting '{}' at {}", model, url);

        let response = self
            .client
            .post(&url)
            .json(&request_body(&model, temperature, &prompt))
            .send()
            .await
            .map_err(|err| ExecuteError::failed(format!("generate request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExecuteError::failed(format!(
                "generate returned {status}: {detail}"
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|err| ExecuteError::failed(format!("malformed generate response: {err}")))?;

        Ok(Value::String(generated.response))
    }
}

/// Palette for the Ollama node.
pub fn palette() -> PaletteNode {
    PaletteNode::new(
        "Server",
        super::OLLAMA_LLM,
        vec![
            PaletteItem::TextDisplay(TextDisplaySpec::new("Input")),
            PaletteItem::Text(TextSpec::new("Base URL", DEFAULT_BASE_URL)),
            PaletteItem::Text(TextSpec::new("Model", "llama3").required()),
            PaletteItem::Slider(
                SliderSpec::new("Temperature", 0.0, 2.0, 0.01, 0.7).with_handle(json!({"top": 123})),
            ),
            PaletteItem::TextDisplay(TextDisplaySpec::new("Output")),
            PaletteItem::Handle(HandleSpec::source(
                "Response",
                json!({"bottom": 12, "top": "auto"}),
            )),
        ],
    )
}
