//! Versioned pipeline store
//!
//! An explicit handle the embedding application owns, replacing any
//! process-wide "last compiled pipeline" state. The store rebuilds only
//! when the incoming description structurally differs from the one it
//! holds, and a rejected build leaves the previous compiled pipeline
//! fully intact.

use crate::builder::build;
use crate::error::BuildError;
use crate::registry::HandlerRegistry;
use crate::types::{Pipeline, PipelineDescription};

/// Outcome of a store update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreUpdate {
    /// The description matched the stored one; nothing was rebuilt
    Unchanged { version: u64 },
    /// The description differed and compiled; the pipeline was replaced
    Rebuilt { version: u64 },
}

impl StoreUpdate {
    /// The store version after the update.
    pub fn version(&self) -> u64 {
        match *self {
            StoreUpdate::Unchanged { version } | StoreUpdate::Rebuilt { version } => version,
        }
    }
}

/// Holds the last accepted description and its compiled pipeline.
#[derive(Debug, Default)]
pub struct PipelineStore {
    description: Option<PipelineDescription>,
    pipeline: Option<Pipeline>,
    version: u64,
}

impl PipelineStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently compiled pipeline, if any build has succeeded.
    pub fn pipeline(&self) -> Option<&Pipeline> {
        self.pipeline.as_ref()
    }

    /// Monotonic version, bumped on every rebuild.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Accept a description: skip when structurally unchanged, otherwise
    /// rebuild. A failed build returns the error and retains the previous
    /// description and pipeline — there is no partial overwrite.
    pub fn update(
        &mut self,
        description: PipelineDescription,
        registry: &HandlerRegistry,
    ) -> Result<StoreUpdate, BuildError> {
        if self.description.as_ref() == Some(&description) {
            log::debug!("description unchanged, keeping pipeline v{}", self.version);
            return Ok(StoreUpdate::Unchanged {
                version: self.version,
            });
        }

        let pipeline = build(&description, registry)?;
        self.description = Some(description);
        self.pipeline = Some(pipeline);
        self.version += 1;
        log::info!("compiled pipeline v{}", self.version);
        Ok(StoreUpdate::Rebuilt {
            version: self.version,
        })
    }
}
