//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract consumed by the service layer.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NoteNotFound`,
//!   `DuplicateTitle`) in addition to DB transport errors.
//! - Mutating methods execute on whatever connection scope the caller
//!   provides; multi-step atomicity is owned by services.

pub mod graph_repo;
