//! Status command implementation

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub fn cmd_status(db_path: &Path) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 Tally Status");
    println!("   ─────────────────────────────────────────────");

    // Database path
    println!("   Database: {}", db_path.display());

    // Check if database file exists and get size
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }

        match open_db(db_path) {
            Ok(db) => {
                println!();
                println!("   Users: {}", db.count_users()?);
                println!("   Transactions: {}", db.count_transactions()?);
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
        println!();
        println!("   Run `tally init` to create it.");
    }

    println!();
    Ok(())
}
