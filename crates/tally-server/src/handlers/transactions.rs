//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{AppError, AppState, AuthUser, SuccessResponse};
use tally_core::models::{NewTransaction, Transaction};

/// GET /api/transactions - List the caller's transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state.db.list_transactions(user.id)?;
    Ok(Json(transactions))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .db
        .get_transaction(user.id, id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(Json(transaction))
}

/// POST /api/transactions - Create a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(new): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    if new.payment_method.is_none() {
        return Err(AppError::bad_request("Payment method is required"));
    }
    if new.amount < 0.0 {
        return Err(AppError::bad_request("Amount must not be negative"));
    }

    let transaction = state.db.create_transaction(user.id, &new)?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// PUT /api/transactions/:id - Replace a transaction
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(new): Json<NewTransaction>,
) -> Result<Json<Transaction>, AppError> {
    if new.payment_method.is_none() {
        return Err(AppError::bad_request("Payment method is required"));
    }
    if new.amount < 0.0 {
        return Err(AppError::bad_request("Amount must not be negative"));
    }

    let transaction = state
        .db
        .update_transaction(user.id, id, &new)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(Json(transaction))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_transaction(user.id, id)? {
        return Err(AppError::not_found("Transaction not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
