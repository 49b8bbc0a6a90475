//! Output nodes

use pipeline_engine::{HandlerRegistry, NodeTypeInfo};
use serde_json::json;

use crate::palette::{HandleSpec, PaletteItem, PaletteNode, TextSpec};

/// Node type name for the text output display.
pub const TEXT_OUTPUT: &str = "Text Output";

/// Register the output node types.
pub fn register(registry: &mut HandlerRegistry) {
    registry.register_passthrough(
        TEXT_OUTPUT,
        NodeTypeInfo::new().with_handle_keys(["Label", "Placeholder"]),
    );
}

/// Palette for the text output node.
pub fn text_output_palette() -> PaletteNode {
    PaletteNode::new(
        "Monitor",
        TEXT_OUTPUT,
        vec![
            PaletteItem::Handle(HandleSpec::target("Value", json!({"top": 51}))),
            PaletteItem::Text(TextSpec::new("Label", "Result")),
            PaletteItem::Text(TextSpec::new("Placeholder", "")),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_output_handle_table() {
        let mut registry = HandlerRegistry::new();
        register(&mut registry);
        assert_eq!(
            registry.override_key(TEXT_OUTPUT, "element_0"),
            Some("Label".to_string())
        );
    }
}
