//! Tally Web Server
//!
//! Axum-based REST API for the Tally personal finance tracker.
//!
//! Security posture:
//! - Bearer-token authentication on every route except signup/login
//! - Admin surface gated by a role claim, not an email allow-list
//! - Restrictive CORS policy
//! - Sanitized error responses (internal details only reach the logs)

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use tally_core::auth::{verify_token, TOKEN_SECRET_ENV};
use tally_core::db::Database;
use tally_core::models::Role;
use tally_core::suggest::SuggestionClient;

mod handlers;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Secret used to sign and verify bearer tokens
    pub token_secret: String,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Create a config with the given token secret
    pub fn new(token_secret: &str) -> Self {
        Self {
            token_secret: token_secret.to_string(),
            allowed_origins: vec![],
        }
    }

    /// Create a config from environment variables
    ///
    /// Requires `TALLY_TOKEN_SECRET`; tokens signed under one secret are
    /// invalidated when it changes.
    pub fn from_env() -> anyhow::Result<Self> {
        let token_secret = std::env::var(TOKEN_SECRET_ENV).map_err(|_| {
            anyhow::anyhow!(
                "Token secret required. Set {} to a long random string.",
                TOKEN_SECRET_ENV
            )
        })?;
        Ok(Self {
            token_secret,
            allowed_origins: vec![],
        })
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Suggestion-service client; None disables suggestions entirely
    pub suggestions: Option<SuggestionClient>,
}

/// The authenticated caller, extracted from a verified bearer token
///
/// Inserted into request extensions by `auth_middleware`; handlers receive
/// it as an extractor.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Reject callers without the admin role
pub fn require_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.role.is_admin() {
        Ok(())
    } else {
        warn!(user = %user.email, "Admin route denied");
        Err(AppError::forbidden("Admin access required"))
    }
}

/// Authentication middleware - validates the bearer token and attaches the
/// caller's identity to the request
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "));

    let Some(token) = token else {
        warn!(path = %request.uri().path(), "Unauthorized request - no bearer token");
        return AppError::unauthorized("Authentication required").into_response();
    };

    match verify_token(state.config.token_secret.as_bytes(), token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser {
                id: claims.sub,
                email: claims.email,
                role: claims.role,
            });
            next.run(request).await
        }
        Err(e) => {
            warn!(path = %request.uri().path(), error = %e, "Unauthorized request - bad token");
            AppError::unauthorized("Invalid or expired token").into_response()
        }
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    // Create the suggestion client if configured
    let suggestions = SuggestionClient::from_env();
    match suggestions {
        Some(ref client) => info!("Suggestion service configured: {}", client.host()),
        None => {
            info!("ℹ️  Suggestion service not configured (set SUGGEST_HOST to enable suggestions)")
        }
    }

    create_router_with_options(db, config, suggestions)
}

/// Create the application router with an explicit suggestion client
/// (for testing)
pub fn create_router_with_options(
    db: Database,
    config: ServerConfig,
    suggestions: Option<SuggestionClient>,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        suggestions,
    });

    // Signup and login are the only unauthenticated routes
    let public_routes = Router::new()
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/login", post(handlers::login));

    let protected_routes = Router::new()
        // Auth
        .route("/auth/me", get(handlers::get_me))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        // Categories
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/:id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route(
            "/budgets/:id",
            put(handlers::update_budget).delete(handlers::delete_budget),
        )
        // Goals
        .route("/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route(
            "/goals/:id",
            get(handlers::get_goal)
                .put(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        // Analytics
        .route("/analytics", get(handlers::get_analytics))
        // Admin
        .route("/admin/users", get(handlers::admin_list_users))
        .route("/admin/users/:id", delete(handlers::admin_delete_user))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes);

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    // Log suggestion-service reachability up front; a dead service only
    // degrades analytics, it never blocks startup
    check_suggestion_connection().await;

    let app = create_router(db, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log suggestion-service connection status
async fn check_suggestion_connection() {
    match SuggestionClient::from_env() {
        Some(client) => {
            if client.health_check().await {
                info!("✅ Suggestion service connected: {}", client.host());
            } else {
                warn!(
                    "⚠️  Suggestion service configured but not responding: {} (analytics will return no suggestions)",
                    client.host()
                );
            }
        }
        None => {
            info!("ℹ️  Suggestion service not configured (set SUGGEST_HOST to enable suggestions)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn forbidden(msg: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
