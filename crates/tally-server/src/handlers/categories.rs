//! Category handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use tally_core::models::{Category, NewCategory};

/// GET /api/categories - List the caller's categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.db.list_categories(user.id)?;
    Ok(Json(categories))
}

/// POST /api/categories - Create a category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(new): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    if new.name.trim().is_empty() {
        return Err(AppError::bad_request("Category name is required"));
    }

    let category = state.db.create_category(user.id, &new)?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id - Replace a category
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(new): Json<NewCategory>,
) -> Result<Json<Category>, AppError> {
    if new.name.trim().is_empty() {
        return Err(AppError::bad_request("Category name is required"));
    }

    let category = state
        .db
        .update_category(user.id, id, &new)?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id - Delete a category
///
/// Transactions keep their category label; categories are labels, not
/// foreign keys.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_category(user.id, id)? {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
