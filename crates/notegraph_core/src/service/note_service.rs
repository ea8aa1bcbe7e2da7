//! Note use-case service.
//!
//! # Responsibility
//! - Provide note create/update/get APIs to the HTTP layer.
//! - Trigger link reconciliation whenever an update carries new content.
//!
//! # Invariants
//! - A note is always created with a non-blank, unique title.
//! - Content edits and the derived-link rebuild they imply commit in the
//!   same transaction.

use crate::model::note::{Note, NoteDraft, NoteId, NotePatch};
use crate::repo::graph_repo::{GraphRepository, RepoError, SqliteGraphRepository};
use crate::service::link_service::rebuild_derived_links;
use rusqlite::TransactionBehavior;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Creation input has an empty or blank title.
    TitleRequired,
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Another note already uses the requested title.
    DuplicateTitle(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleRequired => write!(f, "note title is required"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::DuplicateTitle(title) => write!(f, "note title already exists: `{title}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NoteNotFound(id) => Self::NoteNotFound(id),
            RepoError::DuplicateTitle(title) => Self::DuplicateTitle(title),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for NoteServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Note service facade used by the HTTP layer.
pub struct NoteService<'conn> {
    conn: &'conn mut rusqlite::Connection,
}

impl<'conn> NoteService<'conn> {
    /// Creates a service over a migrated, ready connection.
    pub fn new(conn: &'conn mut rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Creates a note from the given draft.
    ///
    /// The title must be non-blank and unused; position, color and cloud are
    /// optional in the draft and default otherwise. The title is stored
    /// verbatim; trimming is the caller's concern, only blankness is
    /// rejected here.
    pub fn create_note(&mut self, draft: &NoteDraft) -> Result<Note, NoteServiceError> {
        if draft.title.trim().is_empty() {
            return Err(NoteServiceError::TitleRequired);
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let note = SqliteGraphRepository::new(&tx).create_note(draft)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(note)
    }

    /// Applies a partial update to a note.
    ///
    /// When the patch carries content, the note's derived links are rebuilt
    /// inside the same transaction, so callers never observe updated content
    /// with a stale link set.
    pub fn update_note(
        &mut self,
        note_id: NoteId,
        patch: &NotePatch,
    ) -> Result<Note, NoteServiceError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let note = {
            let repo = SqliteGraphRepository::new(&tx);
            let note = repo.update_note_fields(note_id, patch)?;
            if let Some(content) = patch.content.as_deref() {
                rebuild_derived_links(&repo, &note, content)?;
            }
            note
        };

        tx.commit().map_err(RepoError::from)?;
        Ok(note)
    }

    /// Gets one note by id.
    pub fn get_note(&self, note_id: NoteId) -> Result<Option<Note>, NoteServiceError> {
        let repo = SqliteGraphRepository::new(&*self.conn);
        Ok(repo.find_note_by_id(note_id)?)
    }
}
