//! Admin handlers
//!
//! Gated by the caller's role claim via `require_admin`, never by
//! comparing against a fixed email address.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::{require_admin, AppError, AppState, AuthUser, SuccessResponse};
use tally_core::analytics::{aggregate, current_month_range};
use tally_core::models::UserMonthlySummary;

/// GET /api/admin/users - All users with current-month income/expense totals
pub async fn admin_list_users(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<UserMonthlySummary>>, AppError> {
    require_admin(&user)?;

    let (month_start, month_end) = current_month_range(Utc::now().date_naive());
    let users = state.db.list_users()?;

    let mut summaries = Vec::with_capacity(users.len());
    for u in users {
        let transactions = state
            .db
            .list_transactions_in_range(u.id, month_start, month_end)?;
        let summary = aggregate(&transactions);
        summaries.push(UserMonthlySummary {
            id: u.id,
            name: u.name,
            email: u.email,
            total_income: summary.total_income,
            total_expense: summary.total_expense,
        });
    }

    Ok(Json(summaries))
}

/// DELETE /api/admin/users/:id - Delete a user and all their data
pub async fn admin_delete_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    require_admin(&user)?;

    if !state.db.delete_user(id)? {
        return Err(AppError::not_found("User not found"));
    }

    info!(admin = %user.email, deleted_user_id = id, "User account deleted");

    Ok(Json(SuccessResponse { success: true }))
}
