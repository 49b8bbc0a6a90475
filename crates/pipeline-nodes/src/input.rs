//! Input nodes
//!
//! Rendered input elements whose live values enter the pipeline through
//! the invocation argument vector. Their handlers pass data through
//! untouched; the interesting part is the palette and handle table.

use pipeline_engine::{HandlerRegistry, NodeTypeInfo};
use serde_json::json;

use crate::palette::{FileSpec, HandleSpec, PaletteItem, PaletteNode, TextSpec};

/// Node type name for single-line text input.
pub const TEXT_INPUT: &str = "Text Input";
/// Node type name for file input.
pub const FILE_INPUT: &str = "File Input";

/// Register the input node types.
pub fn register(registry: &mut HandlerRegistry) {
    registry.register_passthrough(
        TEXT_INPUT,
        NodeTypeInfo::new().with_handle_keys(["Label", "Placeholder", "Type"]),
    );
    registry.register_passthrough(FILE_INPUT, NodeTypeInfo::new().with_handle_keys(["Label"]));
}

/// Palette for the text input node.
pub fn text_input_palette() -> PaletteNode {
    PaletteNode::new(
        "TextCursor",
        TEXT_INPUT,
        vec![
            PaletteItem::Text(TextSpec::new("Label", "Textbox")),
            PaletteItem::Text(TextSpec::new("Placeholder", "Type here...")),
            PaletteItem::Text(TextSpec::new("Type", "text")),
            PaletteItem::Handle(HandleSpec::source(
                "Value",
                json!({"bottom": 12, "top": "auto"}),
            )),
        ],
    )
}

/// Palette for the file input node.
pub fn file_input_palette() -> PaletteNode {
    PaletteNode::new(
        "File",
        FILE_INPUT,
        vec![
            PaletteItem::File(FileSpec::new("Label")),
            PaletteItem::Handle(HandleSpec::source(
                "Value",
                json!({"bottom": 12, "top": "auto"}),
            )),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_text_input_is_passthrough() {
        let mut registry = HandlerRegistry::new();
        register(&mut registry);

        let handler = registry.resolve(TEXT_INPUT);
        let out = handler.call(json!("hello"), &[]).await.unwrap();
        assert_eq!(out, json!("hello"));
    }

    #[test]
    fn test_text_input_handle_table() {
        let mut registry = HandlerRegistry::new();
        register(&mut registry);

        assert_eq!(
            registry.override_key(TEXT_INPUT, "element_1"),
            Some("Placeholder".to_string())
        );
        assert_eq!(registry.override_key(FILE_INPUT, "element_1"), None);
    }

    #[test]
    fn test_palette_names_match_type_constants() {
        assert_eq!(text_input_palette().name, TEXT_INPUT);
        assert_eq!(file_input_palette().name, FILE_INPUT);
    }
}
