//! Note-graph repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide persistence APIs for notes, connections and clouds.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Note titles and cloud names stay unique; violations surface as
//!   `DuplicateTitle`/`DuplicateCloudName` regardless of whether the
//!   pre-check or the SQLite constraint catches them.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every method runs single statements on the connection it was built
//!   over, so a repository built over a transaction inherits its scope.

use crate::db::DbError;
use crate::model::cloud::{Cloud, CloudId};
use crate::model::connection::{Connection as NoteConnection, ConnectionId, ConnectionKind};
use crate::model::note::{Note, NoteDraft, NoteId, NotePatch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    x,
    y,
    z,
    color,
    cloud_id
FROM notes";

const CONNECTION_SELECT_SQL: &str = "SELECT
    id,
    source_id,
    target_id,
    type
FROM connections";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for note-graph persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying storage failure.
    Db(DbError),
    /// Referenced note id does not exist.
    NoteNotFound(NoteId),
    /// Referenced cloud id does not exist.
    CloudNotFound(CloudId),
    /// Another note already uses this title.
    DuplicateTitle(String),
    /// Another cloud already uses this name.
    DuplicateCloudName(String),
    /// Persisted row cannot be converted to a valid domain value.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::CloudNotFound(id) => write!(f, "cloud not found: {id}"),
            Self::DuplicateTitle(title) => write!(f, "note title already exists: `{title}`"),
            Self::DuplicateCloudName(name) => write!(f, "cloud name already exists: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted graph data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note-graph persistence.
///
/// Services depend on this trait, never on SQLite directly, so storage can
/// be substituted in tests. Implementations must read their own writes
/// within one unit of work: the reconciler relies on a freshly created stub
/// being found by a later title lookup in the same pass.
pub trait GraphRepository {
    /// Resolves a note by exact title match.
    fn find_note_by_title(&self, title: &str) -> RepoResult<Option<Note>>;
    /// Gets one note by id.
    fn find_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Creates a note and returns it with its assigned id.
    fn create_note(&self, draft: &NoteDraft) -> RepoResult<Note>;
    /// Applies a partial update and returns the updated note.
    fn update_note_fields(&self, id: NoteId, patch: &NotePatch) -> RepoResult<Note>;
    /// Deletes every connection with the given source and kind, returning
    /// the number removed.
    fn delete_connections_from(&self, source_id: NoteId, kind: ConnectionKind)
        -> RepoResult<usize>;
    /// Creates a connection between two existing notes.
    fn create_connection(
        &self,
        source_id: NoteId,
        target_id: NoteId,
        kind: ConnectionKind,
    ) -> RepoResult<NoteConnection>;
    /// Finds a connection by endpoint pair, ignoring kind.
    fn find_connection_between(
        &self,
        source_id: NoteId,
        target_id: NoteId,
    ) -> RepoResult<Option<NoteConnection>>;
    /// Deletes one connection by id. Returns whether a row was removed.
    fn delete_connection(&self, id: ConnectionId) -> RepoResult<bool>;
    /// Lists all notes.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Lists all connections.
    fn list_connections(&self) -> RepoResult<Vec<NoteConnection>>;
    /// Lists all clouds.
    fn list_clouds(&self) -> RepoResult<Vec<Cloud>>;
    /// Creates a cloud with a unique name.
    fn create_cloud(&self, name: &str) -> RepoResult<Cloud>;
    /// Deletes a cloud, clearing the cloud reference on notes that pointed
    /// to it. Callers provide the transaction scope.
    fn delete_cloud(&self, id: CloudId) -> RepoResult<()>;
}

/// SQLite-backed note-graph repository.
///
/// Borrows a connection; `rusqlite::Transaction` derefs to `Connection`, so
/// building a repository over `&tx` scopes every method to that
/// transaction.
pub struct SqliteGraphRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGraphRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl GraphRepository for SqliteGraphRepository<'_> {
    fn find_note_by_title(&self, title: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE title = ?1;"))?;
        let mut rows = stmt.query([title])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn find_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn create_note(&self, draft: &NoteDraft) -> RepoResult<Note> {
        if self.find_note_by_title(draft.title.as_str())?.is_some() {
            return Err(RepoError::DuplicateTitle(draft.title.clone()));
        }

        let inserted = self.conn.execute(
            "INSERT INTO notes (title, content, x, y, z, color, cloud_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                draft.title.as_str(),
                draft.content.as_str(),
                draft.x,
                draft.y,
                draft.z,
                draft.color.as_str(),
                draft.cloud_id,
            ],
        );
        if let Err(err) = inserted {
            // The pre-check above is not authoritative under concurrent
            // writers; the unique index is.
            if is_unique_violation(&err) {
                return Err(RepoError::DuplicateTitle(draft.title.clone()));
            }
            return Err(err.into());
        }

        Ok(Note {
            id: self.conn.last_insert_rowid(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            x: draft.x,
            y: draft.y,
            z: draft.z,
            color: draft.color.clone(),
            cloud_id: draft.cloud_id,
        })
    }

    fn update_note_fields(&self, id: NoteId, patch: &NotePatch) -> RepoResult<Note> {
        if !patch.is_empty() {
            let mut assignments: Vec<&'static str> = Vec::new();
            let mut bind_values: Vec<Value> = Vec::new();

            if let Some(content) = patch.content.as_ref() {
                assignments.push("content = ?");
                bind_values.push(Value::Text(content.clone()));
            }
            if let Some(x) = patch.x {
                assignments.push("x = ?");
                bind_values.push(Value::Real(x));
            }
            if let Some(y) = patch.y {
                assignments.push("y = ?");
                bind_values.push(Value::Real(y));
            }
            if let Some(z) = patch.z {
                assignments.push("z = ?");
                bind_values.push(Value::Real(z));
            }
            if let Some(color) = patch.color.as_ref() {
                assignments.push("color = ?");
                bind_values.push(Value::Text(color.clone()));
            }
            if let Some(cloud_id) = patch.cloud_id {
                assignments.push("cloud_id = ?");
                bind_values.push(match cloud_id {
                    Some(cloud_id) => Value::Integer(cloud_id),
                    None => Value::Null,
                });
            }

            let sql = format!(
                "UPDATE notes SET {} WHERE id = ?;",
                assignments.join(", ")
            );
            bind_values.push(Value::Integer(id));

            let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
            if changed == 0 {
                return Err(RepoError::NoteNotFound(id));
            }
        }

        self.find_note_by_id(id)?.ok_or(RepoError::NoteNotFound(id))
    }

    fn delete_connections_from(
        &self,
        source_id: NoteId,
        kind: ConnectionKind,
    ) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM connections WHERE source_id = ?1 AND type = ?2;",
            params![source_id, kind_to_db(kind)],
        )?;
        Ok(removed)
    }

    fn create_connection(
        &self,
        source_id: NoteId,
        target_id: NoteId,
        kind: ConnectionKind,
    ) -> RepoResult<NoteConnection> {
        self.conn.execute(
            "INSERT INTO connections (source_id, target_id, type)
             VALUES (?1, ?2, ?3);",
            params![source_id, target_id, kind_to_db(kind)],
        )?;

        Ok(NoteConnection {
            id: self.conn.last_insert_rowid(),
            source_id,
            target_id,
            kind,
        })
    }

    fn find_connection_between(
        &self,
        source_id: NoteId,
        target_id: NoteId,
    ) -> RepoResult<Option<NoteConnection>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONNECTION_SELECT_SQL}
             WHERE source_id = ?1 AND target_id = ?2
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![source_id, target_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_connection_row(row)?));
        }
        Ok(None)
    }

    fn delete_connection(&self, id: ConnectionId) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM connections WHERE id = ?1;", [id])?;
        Ok(removed > 0)
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!("{NOTE_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn list_connections(&self) -> RepoResult<Vec<NoteConnection>> {
        let mut stmt = self.conn.prepare(&format!("{CONNECTION_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut connections = Vec::new();
        while let Some(row) = rows.next()? {
            connections.push(parse_connection_row(row)?);
        }
        Ok(connections)
    }

    fn list_clouds(&self) -> RepoResult<Vec<Cloud>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM clouds;")?;
        let mut rows = stmt.query([])?;
        let mut clouds = Vec::new();
        while let Some(row) = rows.next()? {
            clouds.push(Cloud {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }
        Ok(clouds)
    }

    fn create_cloud(&self, name: &str) -> RepoResult<Cloud> {
        let existing: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM clouds WHERE name = ?1);",
            [name],
            |row| row.get(0),
        )?;
        if existing == 1 {
            return Err(RepoError::DuplicateCloudName(name.to_string()));
        }

        let inserted = self
            .conn
            .execute("INSERT INTO clouds (name) VALUES (?1);", [name]);
        if let Err(err) = inserted {
            if is_unique_violation(&err) {
                return Err(RepoError::DuplicateCloudName(name.to_string()));
            }
            return Err(err.into());
        }

        Ok(Cloud {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn delete_cloud(&self, id: CloudId) -> RepoResult<()> {
        // Detach first so the FK on notes.cloud_id never blocks the delete.
        // Notes themselves are never removed here.
        self.conn.execute(
            "UPDATE notes SET cloud_id = NULL WHERE cloud_id = ?1;",
            [id],
        )?;

        let removed = self.conn.execute("DELETE FROM clouds WHERE id = ?1;", [id])?;
        if removed == 0 {
            return Err(RepoError::CloudNotFound(id));
        }

        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        x: row.get("x")?,
        y: row.get("y")?,
        z: row.get("z")?,
        color: row.get("color")?,
        cloud_id: row.get("cloud_id")?,
    })
}

fn parse_connection_row(row: &Row<'_>) -> RepoResult<NoteConnection> {
    let kind_text: String = row.get("type")?;
    let kind = parse_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid connection type `{kind_text}` in connections.type"
        ))
    })?;

    Ok(NoteConnection {
        id: row.get("id")?,
        source_id: row.get("source_id")?,
        target_id: row.get("target_id")?,
        kind,
    })
}

fn kind_to_db(kind: ConnectionKind) -> &'static str {
    match kind {
        ConnectionKind::Manual => "manual",
        ConnectionKind::Derived => "derived",
    }
}

fn parse_kind(value: &str) -> Option<ConnectionKind> {
    match value {
        "manual" => Some(ConnectionKind::Manual),
        "derived" => Some(ConnectionKind::Derived),
        _ => None,
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    // Only UNIQUE counts; FK and CHECK violations must keep surfacing as
    // storage errors.
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
