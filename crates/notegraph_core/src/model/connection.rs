//! Connection domain model.
//!
//! # Responsibility
//! - Define directed note-to-note edges and their ownership kinds.
//!
//! # Invariants
//! - `source_id` and `target_id` always reference existing notes.
//! - `Derived` connections are fully owned by the link reconciler and are
//!   rebuilt on every content edit of the source note.
//! - `Manual` connections are never touched by reconciliation.

use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};

/// Stable identifier for a connection, assigned by storage on creation.
pub type ConnectionId = i64;

/// Who owns an edge: the user, or the content parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// User-drawn; persists independent of note content.
    Manual,
    /// Machine-generated from a `[[Title]]` reference in the source note.
    Derived,
}

/// A directed edge between two notes.
///
/// Serialized field names (`source`, `target`, `type`) match what the graph
/// rendering client consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    #[serde(rename = "source")]
    pub source_id: NoteId,
    #[serde(rename = "target")]
    pub target_id: NoteId,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
}
