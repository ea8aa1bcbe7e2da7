//! Full-graph export for the presentation layer.
//!
//! # Responsibility
//! - Project the complete stored state into the shape the rendering client
//!   consumes.
//!
//! # Invariants
//! - Every currently stored note, connection and cloud appears exactly
//!   once; no filtering, pagination or ordering guarantee.
//! - Pure read, no side effects.

use crate::model::cloud::Cloud;
use crate::model::connection::Connection;
use crate::model::note::Note;
use crate::repo::graph_repo::{GraphRepository, RepoResult};
use serde::Serialize;

/// The exported graph view.
///
/// Serialization of the contained models already matches the external
/// interface: connections emit `source`/`target`/`type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<Note>,
    pub links: Vec<Connection>,
    pub clouds: Vec<Cloud>,
}

/// Read-only graph assembly service.
pub struct GraphService<R: GraphRepository> {
    repo: R,
}

impl<R: GraphRepository> GraphService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Reads the full current state of all three entity collections.
    pub fn export_graph(&self) -> RepoResult<GraphExport> {
        Ok(GraphExport {
            nodes: self.repo.list_notes()?,
            links: self.repo.list_connections()?,
            clouds: self.repo.list_clouds()?,
        })
    }
}
