//! Mock suggestion backend for testing
//!
//! Returns canned suggestions, or fails on demand to exercise the
//! degrade-to-empty contract without a running advice service.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{ExpenseItem, SuggestionBackend};

/// Mock suggestion backend
#[derive(Clone, Default)]
pub struct MockSuggestionBackend {
    /// Suggestions returned by `suggest`
    pub suggestions: Vec<String>,
    /// When true, every `suggest` call fails
    pub fail: bool,
}

impl MockSuggestionBackend {
    /// Create a mock that returns no suggestions
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that returns the given suggestions
    pub fn with_suggestions(suggestions: Vec<String>) -> Self {
        Self {
            suggestions,
            fail: false,
        }
    }

    /// Create a mock whose calls always fail
    pub fn failing() -> Self {
        Self {
            suggestions: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SuggestionBackend for MockSuggestionBackend {
    async fn suggest(&self, _expenses: &[ExpenseItem]) -> Result<Vec<String>> {
        if self.fail {
            return Err(Error::Suggestion("mock backend failure".to_string()));
        }
        Ok(self.suggestions.clone())
    }

    async fn health_check(&self) -> bool {
        !self.fail
    }

    fn host(&self) -> &str {
        "mock"
    }
}
