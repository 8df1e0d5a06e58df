//! Analytics endpoint
//!
//! Binds the authenticated user and an optional date range to the
//! aggregation engine and the suggestion adapter, and serializes the merged
//! result. The aggregation itself lives in `tally_core::analytics`; this
//! handler only loads, delegates, and merges.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, AuthUser};
use tally_core::analytics::{aggregate, filter_by_date, AnalyticsSummary};
use tally_core::suggest::expense_items;

/// Query parameters for the analytics endpoint
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    /// Inclusive range start (YYYY-MM-DD); only honored together with endDate
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    /// Inclusive range end (YYYY-MM-DD); only honored together with startDate
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// The combined analytics result: aggregation plus best-effort suggestions
#[derive(Serialize)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub summary: AnalyticsSummary,
    pub suggestions: Vec<String>,
}

/// GET /api/analytics - Totals, balance, category breakdown, suggestions
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let start = params
        .start_date
        .as_ref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| AppError::bad_request("Invalid startDate format (use YYYY-MM-DD)"))?;

    let end = params
        .end_date
        .as_ref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| AppError::bad_request("Invalid endDate format (use YYYY-MM-DD)"))?;

    let transactions = state.db.list_transactions(user.id)?;
    let filtered = filter_by_date(transactions, start, end);
    let summary = aggregate(&filtered);

    // Best-effort: adapter failures already degrade to an empty list inside
    // the client, and an unconfigured service behaves the same way
    let suggestions = match &state.suggestions {
        Some(client) => client.get_suggestions(&expense_items(&filtered)).await,
        None => Vec::new(),
    };

    Ok(Json(AnalyticsResponse {
        summary,
        suggestions,
    }))
}
