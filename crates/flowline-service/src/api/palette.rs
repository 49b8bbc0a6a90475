//! Node palette endpoints
//!
//! The builder frontend populates its canvas from these listings: one
//! endpoint per category enumerating the available options, and one per
//! node type returning the palette JSON to render.

use axum::Json;
use serde::Serialize;

use pipeline_nodes::{chat, helpers, input, llm, output, PaletteNode};

/// One entry of a category listing.
#[derive(Debug, Serialize)]
pub struct OptionEntry {
    pub name: &'static str,
    pub detail: &'static str,
}

/// Category listing response body.
#[derive(Debug, Serialize)]
pub struct AvailableOptions {
    pub options: Vec<OptionEntry>,
}

/// List the available input options.
pub async fn list_inputs() -> Json<AvailableOptions> {
    Json(AvailableOptions {
        options: vec![
            OptionEntry {
                name: "Text",
                detail: "Single-line text input",
            },
            OptionEntry {
                name: "File",
                detail: "File upload input",
            },
        ],
    })
}

/// List the available chat options.
pub async fn list_chats() -> Json<AvailableOptions> {
    Json(AvailableOptions {
        options: vec![
            OptionEntry {
                name: "Text-Chat",
                detail: "Text-only chat input/output",
            },
            OptionEntry {
                name: "Multimodal-Chat",
                detail: "Multimodal chat input/output",
            },
        ],
    })
}

/// List the available model providers.
pub async fn list_llms() -> Json<AvailableOptions> {
    Json(AvailableOptions {
        options: vec![
            OptionEntry {
                name: "OpenAI",
                detail: "OpenAI chat completion",
            },
            OptionEntry {
                name: "Ollama",
                detail: "Local Ollama server",
            },
        ],
    })
}

/// List the available helper functions.
pub async fn list_helpers() -> Json<AvailableOptions> {
    Json(AvailableOptions {
        options: vec![
            OptionEntry {
                name: "System Prompt",
                detail: "System prompt source",
            },
            OptionEntry {
                name: "Chat Constructor",
                detail: "Combines prompt parts",
            },
        ],
    })
}

/// List the available output options.
pub async fn list_outputs() -> Json<AvailableOptions> {
    Json(AvailableOptions {
        options: vec![OptionEntry {
            name: "Text",
            detail: "Text result display",
        }],
    })
}

pub async fn text_input_node() -> Json<PaletteNode> {
    Json(input::text_input_palette())
}

pub async fn file_input_node() -> Json<PaletteNode> {
    Json(input::file_input_palette())
}

pub async fn text_chat_node() -> Json<PaletteNode> {
    Json(chat::text_chat_palette())
}

pub async fn multimodal_chat_node() -> Json<PaletteNode> {
    Json(chat::multimodal_chat_palette())
}

pub async fn openai_node() -> Json<PaletteNode> {
    Json(llm::openai_palette())
}

pub async fn ollama_node() -> Json<PaletteNode> {
    Json(llm::ollama_palette())
}

pub async fn system_prompt_node() -> Json<PaletteNode> {
    Json(helpers::system_prompt_palette())
}

pub async fn chat_constructor_node() -> Json<PaletteNode> {
    Json(helpers::chat_constructor_palette())
}

pub async fn text_output_node() -> Json<PaletteNode> {
    Json(output::text_output_palette())
}
