//! Tally CLI - Personal finance tracker
//!
//! Usage:
//!   tally init                 Initialize database
//!   tally users add ...        Create a user (--admin for the admin role)
//!   tally serve --port 5000    Start the REST API server
//!   tally status               Show database status

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            origins,
        } => commands::cmd_serve(&cli.db, &host, port, &origins).await,
        Commands::Status => commands::cmd_status(&cli.db),
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add {
                    name,
                    email,
                    password,
                    admin,
                }) => commands::cmd_users_add(&db, &name, &email, password.as_deref(), admin),
            }
        }
    }
}
