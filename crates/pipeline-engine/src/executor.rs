//! Pipeline execution
//!
//! Walks the compiled graph in its fixed order, merges override bindings
//! into a fresh configuration snapshot per node, invokes each node's
//! handlers strictly sequentially, and threads the results forward. The
//! compiled pipeline is never mutated, so the same pipeline replays
//! safely with different live values.

use serde_json::Value;

use crate::error::ExecuteError;
use crate::types::{ConfigItem, OverrideBinding, Pipeline, PipelineNode};

/// Advisory returned when chat execution is attempted against a pipeline
/// with no nodes.
pub const DISCONNECTED_MESSAGE: &str =
    "Pipeline is not connected. Connect some nodes to start chatting.";

/// Execute the pipeline against the live invocation arguments.
///
/// The initial payload is the live argument vector itself; each node's
/// handler results become the payload for the next node. A single-element
/// final payload is unwrapped, anything else is returned as a list.
pub async fn execute(pipeline: &Pipeline, live_args: &[Value]) -> Result<Value, ExecuteError> {
    let mut data = Value::Array(live_args.to_vec());

    for id in &pipeline.order {
        let Some(node) = pipeline.nodes.get(id) else {
            continue;
        };
        let args = resolve_args(node, live_args)?;

        let mut results = Vec::with_capacity(node.handlers.len());
        for (index, handler) in node.handlers.iter().enumerate() {
            let slice = payload_slice(&data, index)
                .ok_or(ExecuteError::EmptyPayload { id: node.id })?;
            log::debug!(
                "executing node {} ('{}'), handler {} of {}",
                node.id,
                node.node_type,
                index + 1,
                node.handlers.len()
            );
            results.push(handler.call(slice, &args).await?);
        }
        data = Value::Array(results);
    }

    Ok(match data {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    })
}

/// Execute in chat mode and fold the result into one display string.
///
/// The conversation arguments (message, history, rendered element values)
/// arrive folded into a single composite live argument. A pipeline with
/// no nodes yields a fixed advisory instead of executing.
pub async fn execute_chat(pipeline: &Pipeline, chat_args: &[Value]) -> Result<String, ExecuteError> {
    if pipeline.is_empty() {
        return Ok(DISCONNECTED_MESSAGE.to_string());
    }
    let folded = Value::Array(chat_args.to_vec());
    let result = execute(pipeline, std::slice::from_ref(&folded)).await?;
    Ok(render_chat_result(&result))
}

/// Merge override bindings into a fresh copy of the node's static
/// configuration. An override whose key names no slot is skipped (the
/// builder already warned about it); an index past the live arguments is
/// fatal.
fn resolve_args(node: &PipelineNode, live_args: &[Value]) -> Result<Vec<ConfigItem>, ExecuteError> {
    let mut args = node.static_args.clone();
    for binding in &node.overrides {
        let value = live_value(live_args, binding)?;
        if let Some(item) = args.iter_mut().find(|item| item.name == binding.key) {
            item.value = value;
        }
    }
    Ok(args)
}

fn live_value(live_args: &[Value], binding: &OverrideBinding) -> Result<Value, ExecuteError> {
    // Chat-mode case: the element vector is folded into the first live
    // argument, behind two conversation-metadata slots.
    if let Some(Value::Array(folded)) = live_args.first() {
        let slot = binding.arg_index + 2;
        return folded
            .get(slot)
            .cloned()
            .ok_or_else(|| ExecuteError::LiveArgOutOfRange {
                key: binding.key.clone(),
                index: slot,
                len: folded.len(),
            });
    }
    live_args
        .get(binding.arg_index)
        .cloned()
        .ok_or_else(|| ExecuteError::LiveArgOutOfRange {
            key: binding.key.clone(),
            index: binding.arg_index,
            len: live_args.len(),
        })
}

/// Pick the payload slice for the handler at `index`.
///
/// List-shaped payloads are indexed positionally, falling back to the
/// first element on arity mismatch; scalar payloads pass whole.
fn payload_slice(data: &Value, index: usize) -> Option<Value> {
    match data {
        Value::Array(items) => items.get(index).or_else(|| items.first()).cloned(),
        other => Some(other.clone()),
    }
}

fn render_chat_result(result: &Value) -> String {
    let first = match result {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return String::new(),
        },
        other => other,
    };

    // Composite results carry the response text plus optional attachments.
    if let Some(text) = first.get("text").and_then(Value::as_str) {
        let mut rendered = text.to_string();
        if let Some(files) = first.get("files").and_then(Value::as_array) {
            if !files.is_empty() {
                rendered.push_str(" - Files:");
                for file in files {
                    rendered.push('\n');
                    rendered.push_str(&display(file));
                }
            }
        }
        return rendered;
    }

    display(first)
}

fn display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::registry::{HandlerRegistry, NodeTypeInfo};
    use crate::types::{
        ConfigItem, EdgeDescription, EdgeKind, NodeDescription, NodeId, PipelineDescription,
    };
    use serde_json::json;

    fn node(id: NodeId, name: &str, items: Vec<ConfigItem>) -> NodeDescription {
        NodeDescription {
            id,
            name: name.to_string(),
            items,
        }
    }

    fn control(source: NodeId, target: NodeId) -> EdgeDescription {
        EdgeDescription {
            kind: EdgeKind::Control,
            source,
            target,
            target_handle: None,
        }
    }

    fn override_edge(source: NodeId, target: NodeId, handle: &str) -> EdgeDescription {
        EdgeDescription {
            kind: EdgeKind::Override,
            source,
            target,
            target_handle: Some(handle.to_string()),
        }
    }

    fn text_registry() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.register_passthrough("Chat", NodeTypeInfo::new().chat_surface());
        registry.register_passthrough("Input", NodeTypeInfo::new());
        registry.register_fn("Upper", NodeTypeInfo::new(), |data, _args| {
            Ok(Value::String(
                data.as_str().unwrap_or_default().to_uppercase(),
            ))
        });
        registry.register_fn("Exclaim", NodeTypeInfo::new(), |data, _args| {
            Ok(Value::String(format!(
                "{}!",
                data.as_str().unwrap_or_default()
            )))
        });
        registry.register_fn(
            "Echo Config",
            NodeTypeInfo::new().with_handle_keys(["Temperature"]),
            |_data, args| {
                let value = args
                    .iter()
                    .find(|item| item.name == "Temperature")
                    .map(|item| item.value.clone())
                    .unwrap_or(Value::Null);
                Ok(value)
            },
        );
        registry
    }

    #[tokio::test]
    async fn test_single_output_unwraps() {
        let description = PipelineDescription {
            nodes: vec![node(1, "Input", vec![]), node(2, "Upper", vec![])],
            edges: vec![control(1, 2)],
        };
        let pipeline = build(&description, &text_registry()).unwrap();

        let result = execute(&pipeline, &[json!("hi")]).await.unwrap();
        assert_eq!(result, json!("HI"));
    }

    #[tokio::test]
    async fn test_multi_node_threading() {
        let description = PipelineDescription {
            nodes: vec![
                node(1, "Input", vec![]),
                node(2, "Upper", vec![]),
                node(3, "Exclaim", vec![]),
            ],
            edges: vec![control(1, 2), control(2, 3)],
        };
        let pipeline = build(&description, &text_registry()).unwrap();

        let result = execute(&pipeline, &[json!("hi")]).await.unwrap();
        assert_eq!(result, json!("HI!"));
    }

    #[tokio::test]
    async fn test_override_round_trip() {
        // Static Temperature 0.7, overridden from live argument 0.
        let description = PipelineDescription {
            nodes: vec![
                node(1, "Input", vec![]),
                node(2, "Input", vec![]),
                node(
                    3,
                    "Echo Config",
                    vec![ConfigItem::new("Temperature", "0.7")],
                ),
            ],
            edges: vec![control(2, 3), override_edge(2, 3, "element_0")],
        };
        let pipeline = build(&description, &text_registry()).unwrap();

        let result = execute(&pipeline, &[json!("0.95")]).await.unwrap();
        assert_eq!(result, json!("0.95"));

        // Replaying with different live values re-resolves from scratch.
        let result = execute(&pipeline, &[json!("0.10")]).await.unwrap();
        assert_eq!(result, json!("0.10"));
        let record = pipeline.node(3).unwrap();
        assert_eq!(record.static_args[0].value, json!("0.7"));
    }

    #[tokio::test]
    async fn test_missing_override_key_is_skipped() {
        let description = PipelineDescription {
            nodes: vec![
                node(1, "Input", vec![]),
                node(2, "Input", vec![]),
                // No Temperature slot: the binding resolves but never lands.
                node(3, "Echo Config", vec![ConfigItem::new("Model", "gpt-4o")]),
            ],
            edges: vec![control(2, 3), override_edge(2, 3, "element_0")],
        };
        let pipeline = build(&description, &text_registry()).unwrap();

        let result = execute(&pipeline, &[json!("0.95")]).await.unwrap();
        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn test_override_index_out_of_range_is_fatal() {
        let description = PipelineDescription {
            nodes: vec![
                node(1, "Input", vec![]),
                node(2, "Input", vec![]),
                node(
                    3,
                    "Echo Config",
                    vec![ConfigItem::new("Temperature", "0.7")],
                ),
            ],
            edges: vec![control(2, 3), override_edge(2, 3, "element_0")],
        };
        let pipeline = build(&description, &text_registry()).unwrap();

        let err = execute(&pipeline, &[]).await.unwrap_err();
        assert!(matches!(err, ExecuteError::LiveArgOutOfRange { .. }));
    }

    #[tokio::test]
    async fn test_extra_live_args_are_ignored() {
        // Two live arguments flow into a single-handler node: the handler
        // receives the first.
        let description = PipelineDescription {
            nodes: vec![
                node(1, "Input", vec![]),
                node(2, "Input", vec![]),
                node(3, "Upper", vec![]),
                node(4, "Exclaim", vec![]),
            ],
            edges: vec![control(1, 3), control(2, 3), control(3, 4)],
        };
        let pipeline = build(&description, &text_registry()).unwrap();

        let result = execute(&pipeline, &[json!("hi"), json!("bye")]).await.unwrap();
        assert_eq!(result, json!("HI!"));
    }

    #[tokio::test]
    async fn test_arity_mismatch_falls_back_to_first_element() {
        use std::collections::BTreeMap;
        use std::sync::Arc;

        use crate::registry::FnHandler;
        use crate::types::PipelineMode;

        // A fan-in record carrying two handlers against a one-element
        // payload: the second handler falls back to the first element.
        let upper = Arc::new(FnHandler::new(|data: Value, _args: &[ConfigItem]| {
            Ok(Value::String(
                data.as_str().unwrap_or_default().to_uppercase(),
            ))
        }));
        let exclaim = Arc::new(FnHandler::new(|data: Value, _args: &[ConfigItem]| {
            Ok(Value::String(format!(
                "{}!",
                data.as_str().unwrap_or_default()
            )))
        }));
        let mut nodes = BTreeMap::new();
        nodes.insert(
            2,
            PipelineNode {
                id: 2,
                node_type: "Fan-In".to_string(),
                requires: vec![1, 1],
                static_args: vec![],
                overrides: vec![],
                handlers: vec![upper, exclaim],
            },
        );
        let pipeline = Pipeline {
            nodes,
            adjacency: BTreeMap::new(),
            order: vec![2],
            mode: PipelineMode::Standard,
            connected: true,
        };

        let result = execute(&pipeline, &[json!("hi")]).await.unwrap();
        assert_eq!(result, json!(["HI", "hi!"]));
    }

    #[tokio::test]
    async fn test_empty_pipeline_passes_live_args_through() {
        let pipeline = build(&PipelineDescription::default(), &text_registry()).unwrap();

        let result = execute(&pipeline, &[json!("only")]).await.unwrap();
        assert_eq!(result, json!("only"));

        let result = execute(&pipeline, &[json!("a"), json!("b")]).await.unwrap();
        assert_eq!(result, json!(["a", "b"]));
    }

    #[tokio::test]
    async fn test_chat_mode_disconnection_advisory() {
        let pipeline = build(&PipelineDescription::default(), &text_registry()).unwrap();
        let rendered = execute_chat(&pipeline, &[json!("hello"), json!([])])
            .await
            .unwrap();
        assert_eq!(rendered, DISCONNECTED_MESSAGE);
    }

    #[tokio::test]
    async fn test_chat_mode_override_reads_folded_slot() {
        let description = PipelineDescription {
            nodes: vec![
                node(1, "Chat", vec![]),
                node(2, "Input", vec![]),
                node(
                    3,
                    "Echo Config",
                    vec![ConfigItem::new("Temperature", "0.7")],
                ),
            ],
            edges: vec![control(1, 3), override_edge(2, 3, "element_0")],
        };
        let pipeline = build(&description, &text_registry()).unwrap();

        // Composite: message, history, element 0 (chat surface), element 1.
        let chat_args = [json!("hello"), json!([]), json!("hello"), json!("0.42")];
        let rendered = execute_chat(&pipeline, &chat_args).await.unwrap();
        assert_eq!(rendered, "0.42");
    }

    #[tokio::test]
    async fn test_chat_result_flattens_text_and_files() {
        let mut registry = text_registry();
        registry.register_fn("Compose", NodeTypeInfo::new(), |_data, _args| {
            Ok(json!({
                "text": "Here you go",
                "files": ["report.pdf", "summary.txt"]
            }))
        });
        let description = PipelineDescription {
            nodes: vec![node(1, "Chat", vec![]), node(2, "Compose", vec![])],
            edges: vec![control(1, 2)],
        };
        let pipeline = build(&description, &registry).unwrap();

        let rendered = execute_chat(&pipeline, &[json!("hi"), json!([])])
            .await
            .unwrap();
        assert_eq!(rendered, "Here you go - Files:\nreport.pdf\nsummary.txt");
    }

    #[tokio::test]
    async fn test_chat_result_coerces_scalars() {
        let mut registry = text_registry();
        registry.register_fn("Count", NodeTypeInfo::new(), |_data, _args| Ok(json!(42)));
        let description = PipelineDescription {
            nodes: vec![node(1, "Chat", vec![]), node(2, "Count", vec![])],
            edges: vec![control(1, 2)],
        };
        let pipeline = build(&description, &registry).unwrap();

        let rendered = execute_chat(&pipeline, &[json!("hi"), json!([])])
            .await
            .unwrap();
        assert_eq!(rendered, "42");
    }

    #[tokio::test]
    async fn test_handler_failure_propagates() {
        let mut registry = text_registry();
        registry.register_fn("Fail", NodeTypeInfo::new(), |_data, _args| {
            Err(ExecuteError::failed("model endpoint unreachable"))
        });
        let description = PipelineDescription {
            nodes: vec![node(1, "Input", vec![]), node(2, "Fail", vec![])],
            edges: vec![control(1, 2)],
        };
        let pipeline = build(&description, &registry).unwrap();

        let err = execute(&pipeline, &[json!("hi")]).await.unwrap_err();
        assert!(matches!(err, ExecuteError::Handler(_)));
    }
}
