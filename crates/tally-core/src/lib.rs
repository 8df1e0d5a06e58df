//! Tally Core Library
//!
//! Shared functionality for the Tally personal finance tracker:
//! - Database access and migrations
//! - Analytics aggregation engine (totals, balance, category breakdown)
//! - Pluggable suggestion-service backends (HTTP, mock)
//! - Password hashing and bearer-token issuance

pub mod analytics;
pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod suggest;

pub use analytics::{aggregate, current_month_range, filter_by_date, AnalyticsSummary, CategoryTotals};
pub use auth::{hash_password, issue_token, verify_password, verify_token, Claims};
pub use db::Database;
pub use error::{Error, Result};
pub use suggest::{
    expense_items, ExpenseItem, HttpSuggestionBackend, MockSuggestionBackend, SuggestionBackend,
    SuggestionClient,
};
