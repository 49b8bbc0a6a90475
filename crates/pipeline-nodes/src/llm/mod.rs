//! Model-calling nodes
//!
//! Each LLM node sends the prompt it receives to a remote endpoint and
//! threads the completion text forward. Credentials, model choice, and
//! sampling parameters come from the node's resolved configuration, so
//! all of them can be driven live through override edges.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaHandler;
pub use openai::OpenAiChatHandler;

use std::sync::Arc;

use pipeline_engine::{HandlerRegistry, NodeTypeInfo};

/// Node type name for the OpenAI chat-completion node.
pub const OPENAI_LLM: &str = "OpenAI LLM";
/// Node type name for the Ollama generate node.
pub const OLLAMA_LLM: &str = "Ollama LLM";

/// Register the model-calling node types.
pub fn register(registry: &mut HandlerRegistry) {
    registry.register(
        OPENAI_LLM,
        NodeTypeInfo::new().with_handle_keys(["API Key", "Model", "Temperature"]),
        Arc::new(OpenAiChatHandler::new()),
    );
    registry.register(
        OLLAMA_LLM,
        NodeTypeInfo::new().with_handle_keys(["Base URL", "Model", "Temperature"]),
        Arc::new(OllamaHandler::new()),
    );
}

/// Palette for the OpenAI node.
pub fn openai_palette() -> crate::palette::PaletteNode {
    openai::palette()
}

/// Palette for the Ollama node.
pub fn ollama_palette() -> crate::palette::PaletteNode {
    ollama::palette()
}
