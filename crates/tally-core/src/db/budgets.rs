//! Budget operations

use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::analytics::current_month_range;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetWithSpent, NewBudget};

impl Database {
    /// Create a budget for a user
    pub fn create_budget(&self, user_id: i64, budget: &NewBudget) -> Result<Budget> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (user_id, category, amount, period) VALUES (?, ?, ?, ?)",
            params![user_id, budget.category, budget.amount, budget.period.as_str()],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {} after insert", id)))
    }

    /// Get a single budget owned by a user
    pub fn get_budget(&self, user_id: i64, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .prepare(
                "SELECT id, user_id, category, amount, period, created_at
                 FROM budgets WHERE id = ? AND user_id = ?",
            )?
            .query_row(params![id, user_id], Self::row_to_budget)
            .optional()?;
        Ok(budget)
    }

    /// List a user's budgets, oldest first
    pub fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, category, amount, period, created_at
             FROM budgets WHERE user_id = ? ORDER BY id",
        )?;
        let budgets = stmt
            .query_map(params![user_id], Self::row_to_budget)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(budgets)
    }

    /// List a user's budgets decorated with the current-month expense total
    /// for each budget's category
    pub fn list_budgets_with_spent(&self, user_id: i64) -> Result<Vec<BudgetWithSpent>> {
        self.list_budgets_with_spent_at(user_id, Utc::now().date_naive())
    }

    /// Same as `list_budgets_with_spent` with an injectable "today" so tests
    /// stay deterministic
    pub fn list_budgets_with_spent_at(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<BudgetWithSpent>> {
        let (month_start, month_end) = current_month_range(today);
        let budgets = self.list_budgets(user_id)?;

        let mut decorated = Vec::with_capacity(budgets.len());
        for budget in budgets {
            let spent = self.expense_total_for_category(
                user_id,
                &budget.category,
                month_start,
                month_end,
            )?;
            decorated.push(BudgetWithSpent { budget, spent });
        }
        Ok(decorated)
    }

    /// Replace a budget owned by a user
    pub fn update_budget(
        &self,
        user_id: i64,
        id: i64,
        budget: &NewBudget,
    ) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE budgets SET category = ?, amount = ?, period = ? WHERE id = ? AND user_id = ?",
            params![
                budget.category,
                budget.amount,
                budget.period.as_str(),
                id,
                user_id
            ],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        drop(conn);

        self.get_budget(user_id, id)
    }

    /// Delete a budget owned by a user
    pub fn delete_budget(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// Helper to convert a row to Budget
    /// Column order: id, user_id, category, amount, period, created_at
    pub(crate) fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        let period_str: String = row.get(4)?;
        let created_at_str: String = row.get(5)?;
        Ok(Budget {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category: row.get(2)?,
            amount: row.get(3)?,
            period: period_str.parse().unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
