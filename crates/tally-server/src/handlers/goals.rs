//! Saving goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use tally_core::models::{Goal, NewGoal};

/// GET /api/goals - List the caller's goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Goal>>, AppError> {
    let goals = state.db.list_goals(user.id)?;
    Ok(Json(goals))
}

/// GET /api/goals/:id - Get a single goal
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Goal>, AppError> {
    let goal = state
        .db
        .get_goal(user.id, id)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;
    Ok(Json(goal))
}

/// POST /api/goals - Create a goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(new): Json<NewGoal>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    if new.title.trim().is_empty() {
        return Err(AppError::bad_request("Goal title is required"));
    }
    if new.target_amount <= 0.0 {
        return Err(AppError::bad_request("Target amount must be positive"));
    }

    let goal = state.db.create_goal(user.id, &new)?;
    Ok((StatusCode::CREATED, Json(goal)))
}

/// PUT /api/goals/:id - Replace a goal
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(new): Json<NewGoal>,
) -> Result<Json<Goal>, AppError> {
    if new.title.trim().is_empty() {
        return Err(AppError::bad_request("Goal title is required"));
    }

    let goal = state
        .db
        .update_goal(user.id, id, &new)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;
    Ok(Json(goal))
}

/// DELETE /api/goals/:id - Delete a goal
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_goal(user.id, id)? {
        return Err(AppError::not_found("Goal not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
