//! Helper nodes for prompt construction

use pipeline_engine::{HandlerRegistry, NodeTypeInfo};
use serde_json::{json, Value};

use crate::args::{arg_str, prompt_text};
use crate::palette::{HandleSpec, PaletteItem, PaletteNode, TextDisplaySpec, TextSpec};

/// Node type name for the system prompt source.
pub const SYSTEM_PROMPT: &str = "System Prompt";
/// Node type name for the chat constructor.
pub const CHAT_CONSTRUCTOR: &str = "Chat Constructor";

/// Register the helper node types.
pub fn register(registry: &mut HandlerRegistry) {
    registry.register_fn(
        SYSTEM_PROMPT,
        NodeTypeInfo::new().with_handle_keys(["Prompt"]),
        |_data, args| {
            // The node is a text source: it emits its configured prompt,
            // ignoring whatever flowed in.
            Ok(Value::String(arg_str(args, "Prompt").unwrap_or_default()))
        },
    );
    registry.register_fn(
        CHAT_CONSTRUCTOR,
        NodeTypeInfo::new().with_handle_keys(["Separator"]),
        |data, args| {
            let separator = arg_str(args, "Separator")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "\n\n".to_string());
            let joined = match &data {
                Value::Array(parts) => parts
                    .iter()
                    .map(prompt_text)
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(&separator),
                other => prompt_text(other),
            };
            Ok(Value::String(joined))
        },
    );
}

/// Palette for the system prompt node.
pub fn system_prompt_palette() -> PaletteNode {
    PaletteNode::new(
        "Terminal",
        SYSTEM_PROMPT,
        vec![
            PaletteItem::TextDisplay(TextDisplaySpec::new("Input")),
            PaletteItem::TextArea(
                TextSpec::new("Prompt", "You are a helpful agent.")
                    .required()
                    .with_handle(json!({"top": 81})),
            ),
            PaletteItem::TextDisplay(TextDisplaySpec::new("Output")),
            PaletteItem::Handle(HandleSpec::source(
                "Prompt",
                json!({"bottom": 12, "top": "auto"}),
            )),
        ],
    )
}

/// Palette for the chat constructor node.
pub fn chat_constructor_palette() -> PaletteNode {
    PaletteNode::new(
        "Combine",
        CHAT_CONSTRUCTOR,
        vec![
            PaletteItem::TextDisplay(TextDisplaySpec::new("Input")),
            PaletteItem::Text(TextSpec::new("Separator", "")),
            PaletteItem::TextDisplay(TextDisplaySpec::new("Output")),
            PaletteItem::Handle(HandleSpec::source(
                "Prompt",
                json!({"bottom": 12, "top": "auto"}),
            )),
        ],
    )
}
