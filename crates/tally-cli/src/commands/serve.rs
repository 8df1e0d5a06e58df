//! Server command implementation

use std::path::Path;

use anyhow::Result;

use tally_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16, origins: &[String]) -> Result<()> {
    println!("🚀 Starting Tally API server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    // Token secret is mandatory; tokens outlive restarts only while the
    // secret stays the same
    let mut config = ServerConfig::from_env()?;
    config.allowed_origins = origins.to_vec();

    if config.allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!("   🌐 CORS origins: {}", config.allowed_origins.join(", "));
    }

    match std::env::var("SUGGEST_HOST") {
        Ok(host) => println!("   💡 Suggestion service: {}", host),
        Err(_) => println!("   💡 Suggestion service: not configured (SUGGEST_HOST unset)"),
    }

    let db = open_db(db_path)?;

    tally_server::serve(db, host, port, config).await
}
