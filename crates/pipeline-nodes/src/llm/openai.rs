//! OpenAI chat-completion node
//!
//! Sends the incoming prompt as a user message, prefixed by the platform
//! system prompt, to an OpenAI-compatible `/v1/chat/completions`
//! endpoint. The API key, model, and temperature come from the node's
//! configuration.

use async_trait::async_trait;
use pipeline_engine::{ConfigItem, ExecuteError, NodeHandler};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::args::{arg_f64, prompt_text, require_str};
use crate::palette::{HandleSpec, PaletteItem, PaletteNode, SliderSpec, TextDisplaySpec, TextSpec};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// System prompt injected ahead of every user message.
const PLATFORM_PROMPT: &str = "You are an assistant running inside a Flowline pipeline. \
Flowline lets anyone assemble a language-model application by connecting nodes on a \
canvas and take the result to production without writing code.";

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Handler calling an OpenAI-compatible chat-completion endpoint.
pub struct OpenAiChatHandler {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiChatHandler {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the handler at a different endpoint (local proxies, tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenAiChatHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn request_body(model: &str, temperature: f64, content: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            {"role": "system", "content": PLATFORM_PROMPT},
            {"role": "user", "content": content}
        ],
        "temperature": temperature
    })
}

#[async_trait]
impl NodeHandler for OpenAiChatHandler {
    async fn call(&self, data: Value, args: &[ConfigItem]) -> Result<Value, ExecuteError> {
        let api_key = require_str(args, "API Key")?;
        let model = require_str(args, "Model")?;
        let temperature = arg_f64(args, "Temperature").unwrap_or(1.0);
        let content = prompt_text(&data);

        let url = format!("{}/v1/chat/completions", self.base_url);
        log::debug!(
            "OpenAI LLM: requesting completion from '{}' ({} prompt chars)",
            model,
            content.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&api_key)
            .json(&request_body(&model, temperature, &content))
            .send()
            .await
            .map_err(|err| ExecuteError::failed(format!("chat completion request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExecuteError::failed(format!(
                "chat completion returned {status}: {detail}"
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|err| ExecuteError::failed(format!("malformed completion response: {err}")))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ExecuteError::failed("completion response carried no choices"))?;

        Ok(Value::String(content))
    }
}

/// Palette for the OpenAI node.
pub fn palette() -> PaletteNode {
    PaletteNode::new(
        "Sparkles",
        super::OPENAI_LLM,
        vec![
            PaletteItem::TextDisplay(TextDisplaySpec::new("Input")),
            PaletteItem::Text(
                TextSpec::new("API Key", "sk-...")
                    .secret()
                    .required()
                    .with_handle(json!({"top": 81})),
            ),
            PaletteItem::Text(TextSpec::new("Model", "gpt-4o-mini").required()),
            PaletteItem::Slider(
                SliderSpec::new("Temperature", 0.0, 2.0, 0.01, 0.7).with_handle(json!({"top": 165})),
            ),
            PaletteItem::TextDisplay(TextDisplaySpec::new("Output")),
            PaletteItem::Handle(HandleSpec::source(
                "Response",
                json!({"bottom": 12, "top": "auto"}),
            )),
        ],
    )
}
