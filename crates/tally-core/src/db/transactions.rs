//! Transaction operations

use chrono::{NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction};

impl Database {
    /// Insert a transaction for a user
    ///
    /// The date defaults to today when omitted. A missing payment method is
    /// rejected here as well as at the API boundary.
    pub fn create_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        let payment_method = tx
            .payment_method
            .ok_or_else(|| Error::InvalidData("Payment method is required".to_string()))?;
        let date = tx.date.unwrap_or_else(|| Utc::now().date_naive());

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (user_id, kind, category, amount, date, description, payment_method)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.kind.as_str(),
                tx.category,
                tx.amount,
                date.to_string(),
                tx.description,
                payment_method.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {} after insert", id)))
    }

    /// Get a single transaction owned by a user
    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let transaction = conn
            .prepare(
                "SELECT id, user_id, kind, category, amount, date, description, payment_method, created_at
                 FROM transactions WHERE id = ? AND user_id = ?",
            )?
            .query_row(params![id, user_id], Self::row_to_transaction)
            .optional()?;
        Ok(transaction)
    }

    /// List all of a user's transactions, newest first
    pub fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, kind, category, amount, date, description, payment_method, created_at
             FROM transactions WHERE user_id = ?
             ORDER BY date DESC, id DESC",
        )?;
        let transactions = stmt
            .query_map(params![user_id], Self::row_to_transaction)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(transactions)
    }

    /// List a user's transactions with date in `[from, to]` inclusive,
    /// newest first
    pub fn list_transactions_in_range(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, kind, category, amount, date, description, payment_method, created_at
             FROM transactions WHERE user_id = ? AND date BETWEEN ? AND ?
             ORDER BY date DESC, id DESC",
        )?;
        let transactions = stmt
            .query_map(
                params![user_id, from.to_string(), to.to_string()],
                Self::row_to_transaction,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(transactions)
    }

    /// Replace a transaction owned by a user
    ///
    /// Returns None when the transaction does not exist or belongs to
    /// someone else.
    pub fn update_transaction(
        &self,
        user_id: i64,
        id: i64,
        tx: &NewTransaction,
    ) -> Result<Option<Transaction>> {
        let payment_method = tx
            .payment_method
            .ok_or_else(|| Error::InvalidData("Payment method is required".to_string()))?;
        let date = tx.date.unwrap_or_else(|| Utc::now().date_naive());

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE transactions
            SET kind = ?, category = ?, amount = ?, date = ?, description = ?, payment_method = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                tx.kind.as_str(),
                tx.category,
                tx.amount,
                date.to_string(),
                tx.description,
                payment_method.as_str(),
                id,
                user_id,
            ],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        drop(conn);

        self.get_transaction(user_id, id)
    }

    /// Delete a transaction owned by a user
    ///
    /// Returns false when the transaction does not exist or belongs to
    /// someone else.
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// Count all transactions across users
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Total expense amount for one category within `[from, to]` inclusive
    pub fn expense_total_for_category(
        &self,
        user_id: i64,
        category: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions
             WHERE user_id = ? AND category = ? AND kind = 'expense' AND date BETWEEN ? AND ?",
            params![user_id, category, from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Helper to convert a row to Transaction
    /// Column order: id, user_id, kind, category, amount, date, description,
    ///               payment_method, created_at
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let kind_str: String = row.get(2)?;
        let date_str: String = row.get(5)?;
        let payment_method_str: String = row.get(7)?;
        let created_at_str: String = row.get(8)?;
        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            kind: kind_str.parse().map_err(|_| {
                rusqlite::Error::InvalidColumnType(2, "kind".to_string(), rusqlite::types::Type::Text)
            })?,
            category: row.get(3)?,
            amount: row.get(4)?,
            date: chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
            description: row.get(6)?,
            payment_method: payment_method_str.parse().map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    7,
                    "payment_method".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
