//! User management commands

use anyhow::{bail, Context, Result};

use tally_core::auth::hash_password;
use tally_core::db::Database;
use tally_core::models::{NewUser, Role};

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users registered yet.");
        return Ok(());
    }

    println!("{:<5} {:<24} {:<32} {:<6}", "ID", "NAME", "EMAIL", "ROLE");
    for user in users {
        println!(
            "{:<5} {:<24} {:<32} {:<6}",
            user.id, user.name, user.email, user.role
        );
    }

    Ok(())
}

pub fn cmd_users_add(
    db: &Database,
    name: &str,
    email: &str,
    password: Option<&str>,
    admin: bool,
) -> Result<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => std::env::var("TALLY_USER_PASSWORD")
            .context("Provide --password or set TALLY_USER_PASSWORD")?,
    };
    if password.is_empty() {
        bail!("Password must not be empty");
    }

    let role = if admin { Role::Admin } else { Role::User };
    let password_hash = hash_password(&password)?;

    let user = db.create_user(&NewUser {
        name: name.to_string(),
        email: email.trim().to_lowercase(),
        password_hash,
        role,
    })?;
    db.seed_default_categories(user.id)?;

    println!("✅ Created {} account {} (id {})", user.role, user.email, user.id);

    Ok(())
}
