//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::db::Database;

/// Open the database, running migrations if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path.to_str().unwrap();
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create an admin account: tally users add --name You --email you@example.com --admin");
    println!("  2. Start the API server: tally serve");

    Ok(())
}
