//! User account operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewUser, StoredCredentials, User};

impl Database {
    /// Create a user
    ///
    /// Fails with `InvalidData` when the email is already registered.
    pub fn create_user(&self, new: &NewUser) -> Result<User> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?",
                params![new.email],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Err(Error::InvalidData(format!(
                "Email already registered: {}",
                new.email
            )));
        }

        conn.execute(
            "INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?)",
            params![new.name, new.email, new.password_hash, new.role.as_str()],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} after insert", id)))
    }

    /// Get a user by id
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .prepare("SELECT id, name, email, role, created_at FROM users WHERE id = ?")?
            .query_row(params![id], Self::row_to_user)
            .optional()?;
        Ok(user)
    }

    /// Get a user by email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .prepare("SELECT id, name, email, role, created_at FROM users WHERE email = ?")?
            .query_row(params![email], Self::row_to_user)
            .optional()?;
        Ok(user)
    }

    /// Get a user and their stored password hash, for login verification
    pub fn get_credentials(&self, email: &str) -> Result<Option<StoredCredentials>> {
        let conn = self.conn()?;
        let creds = conn
            .prepare(
                "SELECT id, name, email, role, created_at, password_hash
                 FROM users WHERE email = ?",
            )?
            .query_row(params![email], |row| {
                Ok(StoredCredentials {
                    user: Self::row_to_user(row)?,
                    password_hash: row.get(5)?,
                })
            })
            .optional()?;
        Ok(creds)
    }

    /// List all users, oldest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, email, role, created_at FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Count registered users
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a user and all data belonging to them
    ///
    /// Returns false when no such user exists.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;

        let deleted = conn.execute("DELETE FROM users WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Ok(false);
        }

        // Remove everything the user owned
        conn.execute("DELETE FROM transactions WHERE user_id = ?", params![id])?;
        conn.execute("DELETE FROM categories WHERE user_id = ?", params![id])?;
        conn.execute("DELETE FROM budgets WHERE user_id = ?", params![id])?;
        conn.execute("DELETE FROM goals WHERE user_id = ?", params![id])?;

        Ok(true)
    }

    /// Helper to convert a row to User
    /// Column order: id, name, email, role, created_at
    pub(crate) fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let role_str: String = row.get(3)?;
        let created_at_str: String = row.get(4)?;
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role: role_str.parse().unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
