//! Saving goal operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Goal, NewGoal};

impl Database {
    /// Create a goal for a user
    pub fn create_goal(&self, user_id: i64, goal: &NewGoal) -> Result<Goal> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (user_id, title, target_amount, current_amount, deadline, description, completed)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                goal.title,
                goal.target_amount,
                goal.current_amount,
                goal.deadline.to_string(),
                goal.description,
                goal.completed,
            ],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_goal(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {} after insert", id)))
    }

    /// Get a single goal owned by a user
    pub fn get_goal(&self, user_id: i64, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let goal = conn
            .prepare(
                "SELECT id, user_id, title, target_amount, current_amount, deadline, description, completed, created_at
                 FROM goals WHERE id = ? AND user_id = ?",
            )?
            .query_row(params![id, user_id], Self::row_to_goal)
            .optional()?;
        Ok(goal)
    }

    /// List a user's goals, oldest first
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, target_amount, current_amount, deadline, description, completed, created_at
             FROM goals WHERE user_id = ? ORDER BY id",
        )?;
        let goals = stmt
            .query_map(params![user_id], Self::row_to_goal)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(goals)
    }

    /// Replace a goal owned by a user
    pub fn update_goal(&self, user_id: i64, id: i64, goal: &NewGoal) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE goals
            SET title = ?, target_amount = ?, current_amount = ?, deadline = ?, description = ?, completed = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                goal.title,
                goal.target_amount,
                goal.current_amount,
                goal.deadline.to_string(),
                goal.description,
                goal.completed,
                id,
                user_id,
            ],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        drop(conn);

        self.get_goal(user_id, id)
    }

    /// Delete a goal owned by a user
    pub fn delete_goal(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM goals WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// Helper to convert a row to Goal
    /// Column order: id, user_id, title, target_amount, current_amount,
    ///               deadline, description, completed, created_at
    pub(crate) fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
        let deadline_str: String = row.get(5)?;
        let completed_int: i64 = row.get(7)?;
        let created_at_str: String = row.get(8)?;
        Ok(Goal {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            target_amount: row.get(3)?,
            current_amount: row.get(4)?,
            deadline: chrono::NaiveDate::parse_from_str(&deadline_str, "%Y-%m-%d")
                .unwrap_or_default(),
            description: row.get(6)?,
            completed: completed_int != 0,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
