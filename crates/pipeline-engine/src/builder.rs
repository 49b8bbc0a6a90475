//! Graph builder: compiles a description into an executable pipeline
//!
//! Edges are resolved in submission order against the 1-based positional
//! node list. Control edges create or extend per-node execution records;
//! override edges attach live-argument bindings. Connectivity is tracked
//! with the union-find structure, and the finished record set is ordered
//! topologically over `requires` with smallest-id tie-breaking.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::connectivity::UnionFind;
use crate::error::BuildError;
use crate::registry::HandlerRegistry;
use crate::types::{
    EdgeKind, NodeDescription, NodeId, OverrideBinding, Pipeline, PipelineDescription,
    PipelineMode, PipelineNode,
};

/// Maximum number of nodes accepted in one description.
///
/// The connectivity structure is pre-sized to this bound.
pub const MAX_PIPELINE_NODES: usize = 1000;

fn resolve(nodes: &[NodeDescription], id: NodeId) -> Result<&NodeDescription, BuildError> {
    if id == 0 || id > nodes.len() {
        return Err(BuildError::NodeOutOfRange {
            id,
            count: nodes.len(),
        });
    }
    Ok(&nodes[id - 1])
}

/// Compile a structural description into a [`Pipeline`].
///
/// Compilation is deterministic for a given input: edges are processed in
/// submission order (control edges, then override edges) and node records
/// are looked up by exact id. Disconnected graphs compile — connectivity
/// is recorded, not enforced — but dependency cycles are rejected.
pub fn build(
    description: &PipelineDescription,
    registry: &HandlerRegistry,
) -> Result<Pipeline, BuildError> {
    let nodes = &description.nodes;
    if nodes.len() > MAX_PIPELINE_NODES {
        return Err(BuildError::TooManyNodes {
            count: nodes.len(),
            capacity: MAX_PIPELINE_NODES,
        });
    }

    let mode = if nodes
        .iter()
        .any(|node| registry.info(&node.name).chat_surface)
    {
        PipelineMode::Chat
    } else {
        PipelineMode::Standard
    };

    // Rendered-element positions, 0-based in submission order. Position 0
    // is the reserved leading slot held by the pipeline's primary surface.
    let mut element_positions: Vec<Option<usize>> = Vec::with_capacity(nodes.len());
    let mut next_position = 0;
    for node in nodes {
        if registry.info(&node.name).renders_element {
            element_positions.push(Some(next_position));
            next_position += 1;
        } else {
            element_positions.push(None);
        }
    }

    let mut uf = UnionFind::new(MAX_PIPELINE_NODES);
    let mut records: BTreeMap<NodeId, PipelineNode> = BTreeMap::new();
    let mut adjacency: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();

    // A true union is a newly joined pair; only those enter the
    // adjacency relation, so duplicate edges leave it untouched.
    fn connect(
        uf: &mut UnionFind,
        adjacency: &mut BTreeMap<NodeId, Vec<NodeId>>,
        source: NodeId,
        target: NodeId,
    ) {
        if uf.union(source - 1, target - 1) {
            adjacency.entry(source).or_default().push(target);
            adjacency.entry(target).or_default().push(source);
        }
    }

    for edge in description.edges.iter().filter(|e| e.kind == EdgeKind::Control) {
        resolve(nodes, edge.source)?;
        let target = resolve(nodes, edge.target)?;

        match records.get_mut(&edge.target) {
            Some(record) => record.requires.push(edge.source),
            None => {
                records.insert(
                    edge.target,
                    PipelineNode {
                        id: edge.target,
                        node_type: target.name.clone(),
                        requires: vec![edge.source],
                        static_args: target.items.clone(),
                        overrides: Vec::new(),
                        handlers: vec![registry.resolve(&target.name)],
                    },
                );
            }
        }
        connect(&mut uf, &mut adjacency, edge.source, edge.target);
    }

    for edge in description.edges.iter().filter(|e| e.kind == EdgeKind::Override) {
        resolve(nodes, edge.source)?;
        let target = resolve(nodes, edge.target)?;

        let handle = edge.target_handle.as_deref().unwrap_or_default();
        let key = registry.override_key(&target.name, handle).ok_or_else(|| {
            BuildError::UnknownHandle {
                node_type: target.name.clone(),
                handle: handle.to_string(),
            }
        })?;

        let position = element_positions[edge.source - 1]
            .ok_or(BuildError::InvalidOverrideSource { id: edge.source })?;
        let arg_index = match mode {
            // The live vector omits the reserved leading element.
            PipelineMode::Standard => position
                .checked_sub(1)
                .ok_or(BuildError::InvalidOverrideSource { id: edge.source })?,
            // The folded vector keeps every element, behind two
            // conversation-metadata slots the executor skips.
            PipelineMode::Chat => position,
        };

        let record = records.entry(edge.target).or_insert_with(|| PipelineNode {
            id: edge.target,
            node_type: target.name.clone(),
            requires: Vec::new(),
            static_args: target.items.clone(),
            overrides: Vec::new(),
            handlers: vec![registry.resolve(&target.name)],
        });
        if !record.static_args.iter().any(|item| item.name == key) {
            log::warn!(
                "override '{}' matches no configuration slot on node {} ('{}'); it will be ignored at execution time",
                key,
                edge.target,
                target.name
            );
        }
        record.overrides.push(OverrideBinding { key, arg_index });
        connect(&mut uf, &mut adjacency, edge.source, edge.target);
    }

    let connected = is_fully_connected(&mut uf, nodes.len());
    let order = execution_order(&records)?;

    log::debug!(
        "compiled pipeline: {} records from {} nodes, mode {:?}, connected {}",
        records.len(),
        nodes.len(),
        mode,
        connected
    );

    Ok(Pipeline {
        nodes: records,
        adjacency,
        order,
        mode,
        connected,
    })
}

fn is_fully_connected(uf: &mut UnionFind, count: usize) -> bool {
    if count <= 1 {
        return true;
    }
    let root = uf.find(0);
    (1..count).all(|ordinal| uf.find(ordinal) == root)
}

/// Topological order over `requires`, choosing the smallest ready id at
/// each step. Equals plain id order whenever submission order already
/// respects dependencies. Predecessors outside the record set (pure
/// input nodes) impose no ordering.
fn execution_order(records: &BTreeMap<NodeId, PipelineNode>) -> Result<Vec<NodeId>, BuildError> {
    let mut in_degree: BTreeMap<NodeId, usize> = records.keys().map(|&id| (id, 0)).collect();
    let mut successors: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    for record in records.values() {
        for &dep in &record.requires {
            if records.contains_key(&dep) {
                in_degree.entry(record.id).and_modify(|degree| *degree += 1);
                successors.entry(dep).or_default().push(record.id);
            }
        }
    }

    let mut ready: BTreeSet<NodeId> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&id, _)| id)
        .collect();
    let mut order = Vec::with_capacity(records.len());

    while let Some(&id) = ready.iter().next() {
        ready.remove(&id);
        order.push(id);
        if let Some(targets) = successors.get(&id) {
            for &target in targets {
                if let Some(degree) = in_degree.get_mut(&target) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(target);
                    }
                }
            }
        }
    }

    if order.len() < records.len() {
        return Err(BuildError::CycleDetected);
    }
    Ok(order)
}
