//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `notegraph_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use notegraph_core::db::migrations::latest_version;
use notegraph_core::db::open_db_in_memory;

fn main() {
    println!("notegraph_core version={}", notegraph_core::core_version());

    match open_db_in_memory() {
        Ok(_conn) => {
            println!("in-memory store ready schema_version={}", latest_version());
        }
        Err(err) => {
            eprintln!("failed to open in-memory store: {err}");
            std::process::exit(1);
        }
    }
}
