//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use tally_core::models::{Budget, BudgetWithSpent, NewBudget};

/// GET /api/budgets - List the caller's budgets with current-month spend
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<BudgetWithSpent>>, AppError> {
    let budgets = state.db.list_budgets_with_spent(user.id)?;
    Ok(Json(budgets))
}

/// POST /api/budgets - Create a budget
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(new): Json<NewBudget>,
) -> Result<(StatusCode, Json<Budget>), AppError> {
    if new.category.trim().is_empty() {
        return Err(AppError::bad_request("Budget category is required"));
    }
    if new.amount < 0.0 {
        return Err(AppError::bad_request("Amount must not be negative"));
    }

    let budget = state.db.create_budget(user.id, &new)?;
    Ok((StatusCode::CREATED, Json(budget)))
}

/// PUT /api/budgets/:id - Replace a budget
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(new): Json<NewBudget>,
) -> Result<Json<Budget>, AppError> {
    if new.category.trim().is_empty() {
        return Err(AppError::bad_request("Budget category is required"));
    }
    if new.amount < 0.0 {
        return Err(AppError::bad_request("Amount must not be negative"));
    }

    let budget = state
        .db
        .update_budget(user.id, id, &new)?
        .ok_or_else(|| AppError::not_found("Budget not found"))?;
    Ok(Json(budget))
}

/// DELETE /api/budgets/:id - Delete a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_budget(user.id, id)? {
        return Err(AppError::not_found("Budget not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
