//! Handler registry for node type dispatch
//!
//! Maps a node's declared type to a strategy object implementing the
//! uniform `(data, args) -> data` transformation, plus the per-type
//! metadata the builder needs: whether the type renders a live input
//! element, whether it is a chat surface, and the override-name table
//! that resolves opaque handles ("element_2") to configuration keys.
//!
//! Handlers are resolved once at build time and stored on the compiled
//! node record; execution never performs string dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ExecuteError;
use crate::types::ConfigItem;

/// Per-node-type transformation.
///
/// Receives the node's current data slice and its resolved configuration
/// (static entries with overrides already merged in). Handlers may have
/// external side effects (e.g. a remote model call); the executor treats
/// them as black boxes and lets failures propagate.
#[async_trait]
pub trait NodeHandler: Send + Sync {
    async fn call(&self, data: Value, args: &[ConfigItem]) -> Result<Value, ExecuteError>;
}

/// Default handler: passes data through untouched.
pub struct Passthrough;

#[async_trait]
impl NodeHandler for Passthrough {
    async fn call(&self, data: Value, _args: &[ConfigItem]) -> Result<Value, ExecuteError> {
        Ok(data)
    }
}

/// Adapter wrapping a synchronous closure as a [`NodeHandler`].
pub struct FnHandler {
    func: Box<dyn Fn(Value, &[ConfigItem]) -> Result<Value, ExecuteError> + Send + Sync>,
}

impl FnHandler {
    pub fn new(
        func: impl Fn(Value, &[ConfigItem]) -> Result<Value, ExecuteError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            func: Box::new(func),
        }
    }
}

#[async_trait]
impl NodeHandler for FnHandler {
    async fn call(&self, data: Value, args: &[ConfigItem]) -> Result<Value, ExecuteError> {
        (self.func)(data, args)
    }
}

/// Build-time metadata for a node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTypeInfo {
    /// Whether instances render a live input element (visible widget or
    /// hidden placeholder) that occupies a position in the live argument
    /// vector
    pub renders_element: bool,
    /// Whether instances are a chat surface; their presence switches the
    /// pipeline into chat mode
    pub chat_surface: bool,
    /// Override-name table: `"element_{i}"` resolves to `handle_keys[i]`,
    /// the human-readable configuration key for that slot
    pub handle_keys: Vec<String>,
}

impl Default for NodeTypeInfo {
    fn default() -> Self {
        Self {
            renders_element: true,
            chat_surface: false,
            handle_keys: Vec::new(),
        }
    }
}

impl NodeTypeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark this type as a chat surface.
    pub fn chat_surface(mut self) -> Self {
        self.chat_surface = true;
        self
    }

    /// Mark this type as rendering no live input element.
    pub fn without_element(mut self) -> Self {
        self.renders_element = false;
        self
    }

    /// Set the override-name table, in slot order.
    pub fn with_handle_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handle_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

struct RegistryEntry {
    handler: Arc<dyn NodeHandler>,
    info: NodeTypeInfo,
}

/// Registry of node types, populated by the embedding application.
///
/// Unregistered types resolve to the passthrough handler with default
/// metadata, so a pipeline referencing an unknown type still compiles;
/// only an override handle against an unknown type fails, because its
/// override-name table is empty.
pub struct HandlerRegistry {
    entries: HashMap<String, RegistryEntry>,
    passthrough: Arc<dyn NodeHandler>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            passthrough: Arc::new(Passthrough),
        }
    }

    /// Register a node type with its metadata and handler.
    pub fn register(
        &mut self,
        node_type: impl Into<String>,
        info: NodeTypeInfo,
        handler: Arc<dyn NodeHandler>,
    ) {
        self.entries
            .insert(node_type.into(), RegistryEntry { handler, info });
    }

    /// Register a node type backed by a synchronous closure.
    pub fn register_fn<F>(&mut self, node_type: impl Into<String>, info: NodeTypeInfo, func: F)
    where
        F: Fn(Value, &[ConfigItem]) -> Result<Value, ExecuteError> + Send + Sync + 'static,
    {
        self.register(node_type, info, Arc::new(FnHandler::new(func)));
    }

    /// Register a node type that only carries metadata; instances pass
    /// data through untouched.
    pub fn register_passthrough(&mut self, node_type: impl Into<String>, info: NodeTypeInfo) {
        let handler = Arc::clone(&self.passthrough);
        self.register(node_type, info, handler);
    }

    /// Resolve the handler for a node type, falling back to passthrough.
    pub fn resolve(&self, node_type: &str) -> Arc<dyn NodeHandler> {
        self.entries
            .get(node_type)
            .map(|entry| Arc::clone(&entry.handler))
            .unwrap_or_else(|| Arc::clone(&self.passthrough))
    }

    /// Metadata for a node type, defaulted for unregistered types.
    pub fn info(&self, node_type: &str) -> NodeTypeInfo {
        self.entries
            .get(node_type)
            .map(|entry| entry.info.clone())
            .unwrap_or_default()
    }

    /// Resolve an opaque override handle to a configuration key.
    ///
    /// Handles follow the `element_{i}` grammar, indexing the type's
    /// override-name table.
    pub fn override_key(&self, node_type: &str, handle: &str) -> Option<String> {
        let slot: usize = handle.strip_prefix("element_")?.parse().ok()?;
        self.entries
            .get(node_type)?
            .info
            .handle_keys
            .get(slot)
            .cloned()
    }

    /// Check if a node type is registered.
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    /// List all registered node type names.
    pub fn node_types(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unregistered_type_resolves_to_passthrough() {
        let registry = HandlerRegistry::new();
        let handler = registry.resolve("mystery");
        let out = handler
            .call(Value::String("unchanged".to_string()), &[])
            .await
            .unwrap();
        assert_eq!(out, Value::String("unchanged".to_string()));
    }

    #[tokio::test]
    async fn test_register_fn_dispatches() {
        let mut registry = HandlerRegistry::new();
        registry.register_fn("Shout", NodeTypeInfo::new(), |data, _args| {
            let text = data.as_str().unwrap_or_default().to_uppercase();
            Ok(Value::String(text))
        });

        let handler = registry.resolve("Shout");
        let out = handler
            .call(Value::String("hi".to_string()), &[])
            .await
            .unwrap();
        assert_eq!(out, Value::String("HI".to_string()));
    }

    #[test]
    fn test_override_key_follows_handle_grammar() {
        let mut registry = HandlerRegistry::new();
        registry.register_passthrough(
            "OpenAI LLM",
            NodeTypeInfo::new().with_handle_keys(["API Key", "Model", "Temperature"]),
        );

        assert_eq!(
            registry.override_key("OpenAI LLM", "element_2"),
            Some("Temperature".to_string())
        );
        assert_eq!(registry.override_key("OpenAI LLM", "element_3"), None);
        assert_eq!(registry.override_key("OpenAI LLM", "slot_2"), None);
        assert_eq!(registry.override_key("Unknown", "element_0"), None);
    }

    #[test]
    fn test_info_defaults_for_unregistered_types() {
        let registry = HandlerRegistry::new();
        let info = registry.info("mystery");
        assert!(info.renders_element);
        assert!(!info.chat_surface);
        assert!(info.handle_keys.is_empty());
    }

    #[test]
    fn test_node_type_listing() {
        let mut registry = HandlerRegistry::new();
        registry.register_passthrough("Text Input", NodeTypeInfo::new());
        registry.register_passthrough("Text Output", NodeTypeInfo::new());

        assert!(registry.has_node_type("Text Input"));
        assert!(!registry.has_node_type("Image Input"));
        assert_eq!(registry.node_types().len(), 2);
    }
}
