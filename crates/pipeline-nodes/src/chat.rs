//! Chat surface nodes
//!
//! Their presence in a description switches the pipeline into chat mode:
//! live arguments arrive folded into one composite record and the final
//! result is flattened into a display string. The surfaces themselves
//! pass data through; the conversation plumbing lives in the executor.

use pipeline_engine::{HandlerRegistry, NodeTypeInfo};
use serde_json::json;

use crate::palette::{CheckboxSpec, HandleSpec, PaletteItem, PaletteNode, TextDisplaySpec, TextSpec};

/// Node type name for the text-only chat surface.
pub const TEXT_CHAT: &str = "Text-Only Chat";
/// Node type name for the multimodal chat surface.
pub const MULTIMODAL_CHAT: &str = "Multimodal Chat";

const HANDLE_KEYS: [&str; 4] = ["Label", "Placeholder", "Right-To-Left", "Rateable"];

/// Register the chat surface node types.
pub fn register(registry: &mut HandlerRegistry) {
    registry.register_passthrough(
        TEXT_CHAT,
        NodeTypeInfo::new()
            .chat_surface()
            .with_handle_keys(HANDLE_KEYS),
    );
    registry.register_passthrough(
        MULTIMODAL_CHAT,
        NodeTypeInfo::new()
            .chat_surface()
            .with_handle_keys(HANDLE_KEYS),
    );
}

fn chat_items(prompt_label: &str) -> Vec<PaletteItem> {
    vec![
        PaletteItem::Handle(HandleSpec::target("Response", json!({"top": 51}))),
        PaletteItem::TextDisplay(TextDisplaySpec::new("Input")),
        PaletteItem::Text(TextSpec::new("Label", "Chat")),
        PaletteItem::Text(TextSpec::new("Placeholder", "")),
        PaletteItem::Checkbox(CheckboxSpec::toggle("Right-To-Left")),
        PaletteItem::Checkbox(CheckboxSpec::toggle("Rateable")),
        PaletteItem::TextDisplay(TextDisplaySpec::new("Output")),
        PaletteItem::Handle(HandleSpec::source(
            prompt_label,
            json!({"bottom": 12, "top": "auto"}),
        )),
    ]
}

/// Palette for the text-only chat node.
pub fn text_chat_palette() -> PaletteNode {
    PaletteNode::new("Chat", TEXT_CHAT, chat_items("Prompt"))
}

/// Palette for the multimodal chat node.
pub fn multimodal_chat_palette() -> PaletteNode {
    PaletteNode::new("Chat", MULTIMODAL_CHAT, chat_items("Content"))
}
