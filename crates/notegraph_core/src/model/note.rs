//! Note domain model.
//!
//! # Responsibility
//! - Define the note record plus the creation/update input shapes.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused for another note.
//! - `title` is the stable lookup key for `[[Title]]` reference resolution.
//! - Position and color are owned by the visualization client; core only
//!   persists them.

use crate::model::cloud::CloudId;
use serde::{Deserialize, Serialize};

/// Stable identifier for a note, assigned by storage on creation.
pub type NoteId = i64;

/// Node color used when a note is created without an explicit one.
pub const DEFAULT_NOTE_COLOR: &str = "#44aaff";

/// A titled unit of content with spatial/display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Stable id, immutable after creation.
    pub id: NoteId,
    /// Globally unique title.
    pub title: String,
    /// Free-form text body. `[[Title]]` references inside it drive derived
    /// connections.
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Display hint for the rendering client.
    pub color: String,
    /// Optional categorization label. `None` means uncategorized.
    pub cloud_id: Option<CloudId>,
}

/// Input shape for creating a note.
///
/// All fields except `title` default: empty content, origin position,
/// [`DEFAULT_NOTE_COLOR`], no cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: String,
    pub cloud_id: Option<CloudId>,
}

impl NoteDraft {
    /// Creates a draft with the given title and defaults for everything else.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            color: DEFAULT_NOTE_COLOR.to_string(),
            cloud_id: None,
        }
    }

    /// Creates the minimal draft used for reconciler-created stub notes.
    ///
    /// Stubs carry only the referenced title; no cloud or color is inherited
    /// from the referencing note.
    pub fn stub(title: impl Into<String>) -> Self {
        Self::new(title)
    }
}

/// Partial update for an existing note.
///
/// `None` fields are left untouched. `cloud_id` is doubly optional so a
/// patch can distinguish "leave" (`None`), "set" (`Some(Some(id))`) and
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub color: Option<String>,
    pub cloud_id: Option<Option<CloudId>>,
}

impl NotePatch {
    /// Patch replacing only the content body.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Returns whether this patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
