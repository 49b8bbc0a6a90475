//! Core types for pipeline graphs
//!
//! Two layers live here: the wire description the builder frontend
//! submits (capitalized keys, 1-based positional node ids) and the
//! compiled in-memory graph the executor walks.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::registry::NodeHandler;

/// Positional node identifier, unique within one pipeline version.
///
/// Ids are 1-based and dense: id `n` refers to the n-th submitted node.
pub type NodeId = usize;

/// One key/value configuration entry on a node.
///
/// The wire shape is `{"Type": "Temperature", "Value": "0.7"}`; the
/// `Type` field names the slot, `Value` carries its current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItem {
    /// Configuration key (e.g. "Model", "Temperature")
    #[serde(rename = "Type")]
    pub name: String,
    /// Current value for the slot
    #[serde(rename = "Value", default)]
    pub value: serde_json::Value,
}

impl ConfigItem {
    /// Create a configuration entry.
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One node of the submitted description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    /// 1-based positional id, stable reference used by edges
    #[serde(rename = "Id")]
    pub id: NodeId,
    /// Declared node type (e.g. "Text Input", "OpenAI LLM")
    #[serde(rename = "Name")]
    pub name: String,
    /// Ordered configuration entries captured by the builder UI
    #[serde(rename = "Items", default)]
    pub items: Vec<ConfigItem>,
}

/// Edge kind tag, disjoint on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Control edge: the target consumes the source's position in the chain
    #[serde(rename = "Normal")]
    Control,
    /// Override edge: binds a live input value to a configuration slot
    #[serde(rename = "Data")]
    Override,
}

/// One edge of the submitted description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDescription {
    #[serde(rename = "Type")]
    pub kind: EdgeKind,
    /// 1-based id of the source node
    #[serde(rename = "Source")]
    pub source: NodeId,
    /// 1-based id of the target node
    #[serde(rename = "Target")]
    pub target: NodeId,
    /// Opaque slot identifier (e.g. "element_2"), override edges only
    #[serde(
        rename = "Target Handle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_handle: Option<String>,
}

/// The full structural description submitted by the builder frontend.
///
/// Compared by structural equality between submissions: the engine only
/// rebuilds when the incoming description differs from the stored one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDescription {
    #[serde(rename = "Nodes", default)]
    pub nodes: Vec<NodeDescription>,
    #[serde(rename = "Edges", default)]
    pub edges: Vec<EdgeDescription>,
}

/// Binding from a configuration key to an index into the live
/// invocation argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideBinding {
    /// Configuration key on the target node (matches a `ConfigItem` name)
    pub key: String,
    /// Index into the live argument vector, mode-adjusted at build time
    pub arg_index: usize,
}

/// Execution mode of a compiled pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// Live arguments arrive as a flat vector
    #[default]
    Standard,
    /// The element vector arrives folded into the first live argument,
    /// behind two conversation-metadata slots
    Chat,
}

/// One compiled stage of the pipeline.
#[derive(Clone)]
pub struct PipelineNode {
    /// Positional id, the execution-order tie-breaker
    pub id: NodeId,
    /// Declared type the handler was resolved from
    pub node_type: String,
    /// Predecessor ids accumulated from control edges (fan-in repeats ids)
    pub requires: Vec<NodeId>,
    /// Configuration snapshot copied from the description at build time.
    /// Never mutated; overrides merge into a fresh copy per execution.
    pub static_args: Vec<ConfigItem>,
    /// Live-argument bindings accumulated from override edges
    pub overrides: Vec<OverrideBinding>,
    /// Resolved transformation handlers, invoked in order
    pub handlers: Vec<Arc<dyn NodeHandler>>,
}

impl fmt::Debug for PipelineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineNode")
            .field("id", &self.id)
            .field("node_type", &self.node_type)
            .field("requires", &self.requires)
            .field("static_args", &self.static_args)
            .field("overrides", &self.overrides)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// A compiled pipeline ready for execution.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Compiled node records, keyed (and iterated) by id
    pub nodes: BTreeMap<NodeId, PipelineNode>,
    /// Undirected adjacency recorded for each newly connecting edge
    pub adjacency: BTreeMap<NodeId, Vec<NodeId>>,
    /// Execution order: topological over `requires`, smallest id first
    /// among ready nodes
    pub order: Vec<NodeId>,
    /// Execution mode detected from the description
    pub mode: PipelineMode,
    /// Whether every submitted node ended up in one connected component.
    /// Informational; disconnected graphs still compile.
    pub connected: bool,
}

impl Pipeline {
    /// Number of compiled node records.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the pipeline compiled to zero records.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a compiled record by id.
    pub fn node(&self, id: NodeId) -> Option<&PipelineNode> {
        self.nodes.get(&id)
    }
}
