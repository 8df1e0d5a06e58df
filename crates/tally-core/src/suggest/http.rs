//! HTTP suggestion backend
//!
//! POSTs the expense projection to `<host>/suggest` and expects a JSON
//! array of strings back. The source has no explicit timeout on this call;
//! here one is imposed so a hung advice service cannot stall an analytics
//! request — a timeout is treated like any other failure upstream.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};

use super::{ExpenseItem, SuggestionBackend};

/// Upper bound on a single suggestion request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Suggestion backend talking to a remote advice service over HTTP
#[derive(Clone)]
pub struct HttpSuggestionBackend {
    http_client: Client,
    base_url: String,
}

impl HttpSuggestionBackend {
    /// Create a new HTTP backend for the given service URL
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from the `SUGGEST_HOST` environment variable
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SUGGEST_HOST").ok()?;
        Some(Self::new(&host))
    }
}

#[async_trait]
impl SuggestionBackend for HttpSuggestionBackend {
    async fn suggest(&self, expenses: &[ExpenseItem]) -> Result<Vec<String>> {
        let url = format!("{}/suggest", self.base_url);
        debug!(url = %url, expenses = expenses.len(), "Requesting suggestions");

        let response = self
            .http_client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(expenses)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Suggestion(format!(
                "Suggestion service returned {}",
                response.status()
            )));
        }

        let suggestions: Vec<String> = response.json().await?;
        Ok(suggestions)
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(&self.base_url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .is_ok()
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
