//! Pluggable suggestion-service abstraction
//!
//! Smart suggestions come from an external advice process that analyzes a
//! user's expense history. The transport is swappable behind the
//! `SuggestionBackend` trait; the shipped binding is an HTTP service
//! (`HttpSuggestionBackend`), with `MockSuggestionBackend` for tests.
//!
//! The advisory subsystem is strictly best-effort: analytics must always
//! return a result even when it is down. `SuggestionClient::get_suggestions`
//! therefore absorbs every failure (connect error, timeout, non-success
//! status, unparsable body) into an empty list.
//!
//! # Configuration
//!
//! Environment variables:
//! - `SUGGEST_BACKEND`: Backend to use (http, mock). Default: http
//! - `SUGGEST_HOST`: Suggestion service URL (required for http backend)

mod http;
mod mock;

pub use http::HttpSuggestionBackend;
pub use mock::MockSuggestionBackend;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::models::{Transaction, TransactionKind};

/// The projection of an expense transaction sent to the advice process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
}

/// Project the expense subset of a transaction set into the wire shape the
/// advice process expects. Income transactions are never sent.
pub fn expense_items(transactions: &[Transaction]) -> Vec<ExpenseItem> {
    transactions
        .iter()
        .filter(|tx| tx.kind == TransactionKind::Expense)
        .map(|tx| ExpenseItem {
            category: tx.category.clone(),
            amount: tx.amount,
            date: tx.date,
            description: tx.description.clone(),
        })
        .collect()
}

/// Trait defining the interface for suggestion backends
///
/// Backends must be Send + Sync to allow use across async tasks. They
/// report failures through `Result`; converting those failures into an
/// empty suggestion list is `SuggestionClient`'s job, not the backend's.
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    /// Submit the expense projection and return the advice strings
    async fn suggest(&self, expenses: &[ExpenseItem]) -> Result<Vec<String>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete suggestion client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum SuggestionClient {
    /// HTTP suggestion service
    Http(HttpSuggestionBackend),
    /// Mock backend for testing
    Mock(MockSuggestionBackend),
}

impl SuggestionClient {
    /// Create a suggestion client from environment variables
    ///
    /// Checks `SUGGEST_BACKEND` to determine which backend to use:
    /// - `http` (default): Uses SUGGEST_HOST
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("SUGGEST_BACKEND").unwrap_or_else(|_| "http".to_string());

        match backend.to_lowercase().as_str() {
            "http" => HttpSuggestionBackend::from_env().map(SuggestionClient::Http),
            "mock" => Some(SuggestionClient::Mock(MockSuggestionBackend::new())),
            other => {
                warn!(backend = other, "Unknown SUGGEST_BACKEND value");
                None
            }
        }
    }

    /// Get suggestions for the given expense items, degrading to empty on
    /// any failure
    ///
    /// This is the only entry point the analytics endpoint uses; backend
    /// errors are logged and swallowed here so they can never surface as a
    /// request error.
    pub async fn get_suggestions(&self, expenses: &[ExpenseItem]) -> Vec<String> {
        let result = match self {
            Self::Http(backend) => backend.suggest(expenses).await,
            Self::Mock(backend) => backend.suggest(expenses).await,
        };

        match result {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!(error = %e, host = self.host(), "Suggestion service failed, returning none");
                Vec::new()
            }
        }
    }

    /// Check if the backend is reachable
    pub async fn health_check(&self) -> bool {
        match self {
            Self::Http(backend) => backend.health_check().await,
            Self::Mock(backend) => backend.health_check().await,
        }
    }

    /// Get the host URL (for logging)
    pub fn host(&self) -> &str {
        match self {
            Self::Http(backend) => backend.host(),
            Self::Mock(backend) => backend.host(),
        }
    }
}
