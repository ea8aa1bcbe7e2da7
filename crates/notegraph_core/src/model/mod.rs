//! Domain model for the note graph.
//!
//! # Responsibility
//! - Define the canonical records persisted by the repository layer.
//! - Keep identity and naming invariants in one place.
//!
//! # Invariants
//! - Every entity is identified by a stable integer id assigned by storage.
//! - Note titles and cloud names are globally unique.

pub mod cloud;
pub mod connection;
pub mod note;
