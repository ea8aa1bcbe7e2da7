//! Manual connection management.
//!
//! # Responsibility
//! - Create and delete user-drawn connections.
//!
//! # Invariants
//! - Creation is idempotent by (source, target) pair: an existing
//!   connection between the endpoints is returned unchanged, whatever its
//!   kind.
//! - Deleting an unknown connection id is a no-op, not an error.

use crate::model::connection::{Connection, ConnectionId, ConnectionKind};
use crate::model::note::NoteId;
use crate::repo::graph_repo::{GraphRepository, RepoError, SqliteGraphRepository};
use rusqlite::TransactionBehavior;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for manual connection use-cases.
#[derive(Debug)]
pub enum ConnectionServiceError {
    /// An endpoint id does not resolve to an existing note.
    MissingEndpoint(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ConnectionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEndpoint(id) => {
                write!(f, "connection endpoint is not an existing note: {id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConnectionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::MissingEndpoint(_) => None,
        }
    }
}

impl From<RepoError> for ConnectionServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ConnectionServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Manual connection facade used by the HTTP layer.
pub struct ConnectionService<'conn> {
    conn: &'conn mut rusqlite::Connection,
}

impl<'conn> ConnectionService<'conn> {
    /// Creates a service over a migrated, ready connection.
    pub fn new(conn: &'conn mut rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Creates a manual connection between two existing notes.
    ///
    /// Returns the already-stored connection when one exists between the
    /// endpoints, including a derived one; no duplicate edge is created on
    /// top of it.
    pub fn create_manual_connection(
        &mut self,
        source_id: NoteId,
        target_id: NoteId,
    ) -> Result<Connection, ConnectionServiceError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let connection = {
            let repo = SqliteGraphRepository::new(&tx);
            for endpoint in [source_id, target_id] {
                if repo.find_note_by_id(endpoint)?.is_none() {
                    return Err(ConnectionServiceError::MissingEndpoint(endpoint));
                }
            }

            match repo.find_connection_between(source_id, target_id)? {
                Some(existing) => existing,
                None => repo.create_connection(source_id, target_id, ConnectionKind::Manual)?,
            }
        };

        tx.commit().map_err(RepoError::from)?;
        Ok(connection)
    }

    /// Deletes a connection by id.
    ///
    /// Returns whether a connection was actually removed; an unknown id
    /// reports `false` instead of failing.
    pub fn delete_connection(&self, id: ConnectionId) -> Result<bool, ConnectionServiceError> {
        let repo = SqliteGraphRepository::new(&*self.conn);
        Ok(repo.delete_connection(id)?)
    }
}
