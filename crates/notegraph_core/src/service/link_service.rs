//! Link reconciliation: rebuilding a note's derived connections from its
//! content.
//!
//! # Responsibility
//! - Persist edited content and re-derive the note's outgoing text links in
//!   one atomic unit of work.
//! - Create stub notes for `[[Title]]` references with no matching note.
//!
//! # Invariants
//! - After `reconcile`, the derived connections out of the note equal
//!   exactly the set implied by parsing its content: no stale entries, no
//!   missing ones.
//! - Manual connections are never touched.
//! - A note's content referencing its own title produces no connection.
//! - Either every mutation of a reconciliation applies, or none do.

use crate::model::connection::{Connection, ConnectionKind};
use crate::model::note::{Note, NoteDraft, NoteId, NotePatch};
use crate::parse::wiki_links::iter_wiki_links;
use crate::repo::graph_repo::{GraphRepository, RepoError, SqliteGraphRepository};
use log::info;
use rusqlite::TransactionBehavior;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for link reconciliation.
#[derive(Debug)]
pub enum LinkServiceError {
    /// The note being reconciled does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure; the transaction was rolled back.
    Repo(RepoError),
}

impl Display for LinkServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LinkServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<RepoError> for LinkServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NoteNotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for LinkServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    /// The note with its new content persisted.
    pub note: Note,
    /// The full derived-connection set out of the note, in reference order.
    pub derived: Vec<Connection>,
}

/// Link reconciliation entry point used by the HTTP layer.
pub struct LinkService<'conn> {
    conn: &'conn mut rusqlite::Connection,
}

impl<'conn> LinkService<'conn> {
    /// Creates a service over a migrated, ready connection.
    pub fn new(conn: &'conn mut rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Persists `new_content` on the note and rebuilds its derived links.
    ///
    /// Runs as a single `Immediate` transaction: content update, stale-link
    /// deletion, stub creation and link creation all commit together or not
    /// at all.
    ///
    /// # Errors
    /// - `NoteNotFound` when `note_id` does not resolve to a note.
    /// - `Repo` for storage failures; no partial state is left behind.
    pub fn reconcile(
        &mut self,
        note_id: NoteId,
        new_content: &str,
    ) -> Result<ReconcileOutcome, LinkServiceError> {
        let started_at = Instant::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let outcome = {
            let repo = SqliteGraphRepository::new(&tx);
            let note = repo.update_note_fields(note_id, &NotePatch::content(new_content))?;
            let derived = rebuild_derived_links(&repo, &note, new_content)?;
            ReconcileOutcome { note, derived }
        };

        tx.commit().map_err(RepoError::from)?;
        info!(
            "event=link_reconcile module=service status=ok note_id={} derived_count={} duration_ms={}",
            note_id,
            outcome.derived.len(),
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }
}

/// Replaces every derived connection out of `source` with the set implied by
/// `content`.
///
/// This is the reconciliation core, generic over the repository so callers
/// own the transaction scope. For each `[[Title]]` occurrence, in order:
///
/// - an existing note with that exact title becomes the link target;
/// - a missing title gets a stub note first (title only, everything else
///   default); a later occurrence of the same title inside this pass finds
///   that stub through the title lookup, because the repository reads its
///   own writes;
/// - a reference resolving to `source` itself is skipped.
///
/// Repeated occurrences produce repeated connections, one per occurrence.
pub fn rebuild_derived_links<R: GraphRepository>(
    repo: &R,
    source: &Note,
    content: &str,
) -> Result<Vec<Connection>, RepoError> {
    repo.delete_connections_from(source.id, ConnectionKind::Derived)?;

    let mut derived = Vec::new();
    for title in iter_wiki_links(content) {
        let target = match repo.find_note_by_title(title)? {
            Some(existing) => existing,
            None => repo.create_note(&NoteDraft::stub(title))?,
        };

        if target.id == source.id {
            continue;
        }

        derived.push(repo.create_connection(source.id, target.id, ConnectionKind::Derived)?);
    }

    Ok(derived)
}
