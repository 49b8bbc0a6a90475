//! Error types for the pipeline engine

use thiserror::Error;

use crate::types::NodeId;

/// Input-validation errors raised while compiling a description.
///
/// A rejected build leaves any previously compiled pipeline intact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// An edge references a node id outside the submitted node list
    #[error("edge references node {id}, but the description has {count} nodes")]
    NodeOutOfRange { id: NodeId, count: usize },

    /// An override handle does not resolve to a configuration key
    #[error("node type '{node_type}' has no configuration slot for handle '{handle}'")]
    UnknownHandle { node_type: String, handle: String },

    /// An override edge's source renders no live input element to bind
    #[error("override edge source node {id} provides no live input element")]
    InvalidOverrideSource { id: NodeId },

    /// The description exceeds the fixed connectivity capacity
    #[error("description has {count} nodes, exceeding the {capacity}-node capacity")]
    TooManyNodes { count: usize, capacity: usize },

    /// The control edges form a dependency cycle
    #[error("dependency cycle detected among pipeline nodes")]
    CycleDetected,
}

/// Errors terminating one execution pass.
///
/// None of these are recovered internally; the embedding application
/// translates them into a user-facing failure. The compiled pipeline is
/// never corrupted by a failed execution.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// An override binding indexes past the live argument vector
    #[error("override '{key}' indexes live argument {index}, but only {len} were supplied")]
    LiveArgOutOfRange {
        key: String,
        index: usize,
        len: usize,
    },

    /// A node was invoked with an empty payload
    #[error("node {id} received no payload to transform")]
    EmptyPayload { id: NodeId },

    /// A node handler failed
    #[error("handler failed: {0}")]
    Handler(String),
}

impl ExecuteError {
    /// Create a handler failure with a message.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_messages_name_the_offender() {
        let err = BuildError::NodeOutOfRange { id: 9, count: 3 };
        assert!(err.to_string().contains("node 9"));

        let err = BuildError::UnknownHandle {
            node_type: "OpenAI LLM".to_string(),
            handle: "element_7".to_string(),
        };
        assert!(err.to_string().contains("element_7"));
    }

    #[test]
    fn test_execute_error_failed_helper() {
        let err = ExecuteError::failed("boom");
        assert_eq!(err.to_string(), "handler failed: boom");
    }
}
