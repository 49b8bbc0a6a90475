//! Built-in node types for Flowline pipelines
//!
//! Each node type contributes three things: the palette JSON the builder
//! frontend renders, the override-name table resolving opaque handles to
//! configuration keys, and the handler executed when the node runs.
//!
//! # Categories
//!
//! - **Input**: text and file input elements
//! - **Chat**: conversational surfaces driving chat-mode execution
//! - **Helpers**: prompt construction stages
//! - **LLM**: remote model calls (OpenAI-compatible, Ollama)
//! - **Output**: result display elements

pub mod args;
pub mod chat;
pub mod helpers;
pub mod input;
pub mod llm;
pub mod output;
pub mod palette;

pub use palette::{PaletteItem, PaletteNode};

use pipeline_engine::HandlerRegistry;

/// Build a registry populated with every built-in node type.
pub fn builtin_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    input::register(&mut registry);
    chat::register(&mut registry);
    helpers::register(&mut registry);
    llm::register(&mut registry);
    output::register(&mut registry);
    registry
}
