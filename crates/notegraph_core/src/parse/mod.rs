//! Content parsing utilities.
//!
//! # Responsibility
//! - Extract `[[Title]]` wiki-style references from note content.

pub mod wiki_links;
