//! Pipeline Engine - graph compilation and execution for Flowline
//!
//! This crate turns a node/edge description submitted by the builder
//! frontend into a compiled, ordered pipeline and executes it against
//! live input values. It supports:
//!
//! - Two-kind edge resolution (control edges vs. parameter-override edges)
//! - Connectivity tracking with a union-find structure
//! - Strategy-object handler dispatch resolved once at build time
//! - Per-execution configuration snapshots (the compiled graph is immutable)
//! - A chat execution mode that folds results into a display string
//!
//! # Architecture
//!
//! `builder::build` compiles a [`types::PipelineDescription`] against a
//! [`registry::HandlerRegistry`] into a [`types::Pipeline`];
//! `executor::execute` walks the compiled graph in its fixed order and
//! threads data through each node's handlers. [`store::PipelineStore`] is
//! the versioned handle the embedding application keeps between builds.
//!
//! The engine assumes at most one build or execution in flight per
//! pipeline; callers exposed to concurrency must serialize access.

pub mod builder;
pub mod connectivity;
pub mod error;
pub mod executor;
pub mod registry;
pub mod store;
pub mod types;

// Re-export key types
pub use builder::{build, MAX_PIPELINE_NODES};
pub use connectivity::UnionFind;
pub use error::{BuildError, ExecuteError};
pub use executor::{execute, execute_chat, DISCONNECTED_MESSAGE};
pub use registry::{FnHandler, HandlerRegistry, NodeHandler, NodeTypeInfo, Passthrough};
pub use store::{PipelineStore, StoreUpdate};
pub use types::{
    ConfigItem, EdgeDescription, EdgeKind, NodeDescription, NodeId, OverrideBinding, Pipeline,
    PipelineDescription, PipelineMode, PipelineNode,
};
