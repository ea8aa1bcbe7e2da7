//! Cloud management.
//!
//! # Responsibility
//! - Create, list and delete categorization clouds.
//!
//! # Invariants
//! - Cloud names stay globally unique.
//! - Deleting a cloud detaches referencing notes in the same transaction;
//!   notes are never deleted by cloud operations.

use crate::model::cloud::{Cloud, CloudId};
use crate::repo::graph_repo::{GraphRepository, RepoError, SqliteGraphRepository};
use rusqlite::TransactionBehavior;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for cloud use-cases.
#[derive(Debug)]
pub enum CloudServiceError {
    /// Creation input has an empty or blank name.
    NameRequired,
    /// Target cloud does not exist.
    CloudNotFound(CloudId),
    /// Another cloud already uses the requested name.
    DuplicateName(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for CloudServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "cloud name is required"),
            Self::CloudNotFound(id) => write!(f, "cloud not found: {id}"),
            Self::DuplicateName(name) => write!(f, "cloud name already exists: `{name}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CloudServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CloudServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CloudNotFound(id) => Self::CloudNotFound(id),
            RepoError::DuplicateCloudName(name) => Self::DuplicateName(name),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for CloudServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Cloud facade used by the HTTP layer.
pub struct CloudService<'conn> {
    conn: &'conn mut rusqlite::Connection,
}

impl<'conn> CloudService<'conn> {
    /// Creates a service over a migrated, ready connection.
    pub fn new(conn: &'conn mut rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Creates a cloud with a unique, non-blank name.
    ///
    /// The name is stored verbatim; only blankness is rejected here.
    pub fn create_cloud(&mut self, name: &str) -> Result<Cloud, CloudServiceError> {
        if name.trim().is_empty() {
            return Err(CloudServiceError::NameRequired);
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let cloud = SqliteGraphRepository::new(&tx).create_cloud(name)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(cloud)
    }

    /// Deletes a cloud, clearing the cloud reference on every note that
    /// pointed to it. Detach and delete commit together.
    pub fn delete_cloud(&mut self, id: CloudId) -> Result<(), CloudServiceError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        SqliteGraphRepository::new(&tx).delete_cloud(id)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(())
    }

    /// Lists all clouds.
    pub fn list_clouds(&self) -> Result<Vec<Cloud>, CloudServiceError> {
        let repo = SqliteGraphRepository::new(&*self.conn);
        Ok(repo.list_clouds()?)
    }
}
