//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own transaction scoping for multi-step mutations.
//! - Keep the HTTP layer decoupled from storage details.

pub mod cloud_service;
pub mod connection_service;
pub mod graph_service;
pub mod link_service;
pub mod note_service;
