//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track income, expenses, budgets, and goals
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable; default is same-origin only)
        #[arg(long = "origin")]
        origins: Vec<String>,
    },

    /// Show database status
    Status,

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List registered users
    List,

    /// Create a user account
    Add {
        /// Display name
        #[arg(long)]
        name: String,

        /// Email address (login identifier)
        #[arg(long)]
        email: String,

        /// Password (prefer TALLY_USER_PASSWORD over passing this on the
        /// command line)
        #[arg(long)]
        password: Option<String>,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
}
