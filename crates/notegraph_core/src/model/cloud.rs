//! Cloud domain model.
//!
//! A cloud is a pure categorization label. Deleting one detaches the notes
//! that point to it; it never cascades into note deletion.

use serde::{Deserialize, Serialize};

/// Stable identifier for a cloud, assigned by storage on creation.
pub type CloudId = i64;

/// A named, optional grouping label attachable to notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cloud {
    pub id: CloudId,
    /// Globally unique name.
    pub name: String,
}
