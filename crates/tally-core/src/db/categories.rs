//! Category operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Category, NewCategory, TransactionKind};

/// Categories created for every new user at signup
pub const DEFAULT_CATEGORIES: &[(&str, TransactionKind, &str)] = &[
    ("Salary", TransactionKind::Income, "#10B981"),
    ("Others", TransactionKind::Income, "#3B82F6"),
    ("Food", TransactionKind::Expense, "#EF4444"),
    ("Transport", TransactionKind::Expense, "#F59E0B"),
    ("Shopping", TransactionKind::Expense, "#8B5CF6"),
    ("Bills", TransactionKind::Expense, "#EC4899"),
];

impl Database {
    /// Create a category for a user
    pub fn create_category(&self, user_id: i64, category: &NewCategory) -> Result<Category> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO categories (user_id, name, kind, color) VALUES (?, ?, ?, ?)",
            params![user_id, category.name, category.kind.as_str(), category.color],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_category(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Category {} after insert", id)))
    }

    /// Seed the default category set for a freshly created user
    pub fn seed_default_categories(&self, user_id: i64) -> Result<()> {
        for (name, kind, color) in DEFAULT_CATEGORIES {
            self.create_category(
                user_id,
                &NewCategory {
                    name: name.to_string(),
                    kind: *kind,
                    color: Some(color.to_string()),
                },
            )?;
        }
        Ok(())
    }

    /// Get a single category owned by a user
    pub fn get_category(&self, user_id: i64, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .prepare(
                "SELECT id, user_id, name, kind, color, created_at
                 FROM categories WHERE id = ? AND user_id = ?",
            )?
            .query_row(params![id, user_id], Self::row_to_category)
            .optional()?;
        Ok(category)
    }

    /// List a user's categories, oldest first
    pub fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, kind, color, created_at
             FROM categories WHERE user_id = ? ORDER BY id",
        )?;
        let categories = stmt
            .query_map(params![user_id], Self::row_to_category)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    /// Replace a category owned by a user
    pub fn update_category(
        &self,
        user_id: i64,
        id: i64,
        category: &NewCategory,
    ) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE categories SET name = ?, kind = ?, color = ? WHERE id = ? AND user_id = ?",
            params![
                category.name,
                category.kind.as_str(),
                category.color,
                id,
                user_id
            ],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        drop(conn);

        self.get_category(user_id, id)
    }

    /// Delete a category owned by a user
    pub fn delete_category(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM categories WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// Helper to convert a row to Category
    /// Column order: id, user_id, name, kind, color, created_at
    pub(crate) fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        let kind_str: String = row.get(3)?;
        let created_at_str: String = row.get(5)?;
        Ok(Category {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            kind: kind_str.parse().map_err(|_| {
                rusqlite::Error::InvalidColumnType(3, "kind".to_string(), rusqlite::types::Type::Text)
            })?,
            color: row.get(4)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
