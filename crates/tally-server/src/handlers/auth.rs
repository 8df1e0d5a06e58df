//! Authentication handlers: signup, login, current user

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, AuthUser};
use tally_core::auth::{hash_password, issue_token, verify_password};
use tally_core::error::Error;
use tally_core::models::{NewUser, Role, User};

/// Request body for POST /api/auth/signup
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Generic message response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/auth/signup - Register a new user
///
/// New users always get the `user` role and the default category set;
/// admins are created out-of-band with `tally users add --admin`.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request("Name, email, and password are required"));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .db
        .create_user(&NewUser {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            password_hash,
            role: Role::User,
        })
        .map_err(|e| match e {
            Error::InvalidData(_) => AppError::bad_request("User already exists"),
            other => other.into(),
        })?;

    state.db.seed_default_categories(user.id)?;

    info!(user = %user.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    ))
}

/// Request body for POST /api/auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The user projection returned alongside a fresh token
#[derive(Serialize)]
pub struct LoginUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Response for POST /api/auth/login
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// POST /api/auth/login - Verify credentials and issue a bearer token
///
/// Unknown email and wrong password produce the same response so the
/// endpoint cannot be used to probe for registered addresses.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let creds = state
        .db
        .get_credentials(&req.email.trim().to_lowercase())?
        .ok_or_else(|| AppError::bad_request("Invalid credentials"))?;

    if !verify_password(&req.password, &creds.password_hash)? {
        return Err(AppError::bad_request("Invalid credentials"));
    }

    let token = issue_token(state.config.token_secret.as_bytes(), &creds.user)?;

    info!(user = %creds.user.email, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: creds.user.id,
            name: creds.user.name,
            email: creds.user.email,
        },
    }))
}

/// GET /api/auth/me - Get the currently authenticated user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .get_user(user.id)?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;
    Ok(Json(user))
}
