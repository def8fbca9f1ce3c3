//! Auth HTTP Routes
//!
//! Register and login endpoints for the identity provider.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::Serialize;

use crate::auth::errors::AuthError;
use crate::auth::service::{AuthService, LoginRequest, RegisterRequest};
use crate::auth::user::{Role, User};

/// Shared auth state
pub struct AuthState {
    pub service: AuthService,
}

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code(),
        }
    }
}

fn error_reply(err: AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err)))
}

// ==================
// Handlers
// ==================

/// Register handler
async fn register_handler(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, Json<ErrorResponse>)> {
    match state.service.register(request) {
        Ok((user, token)) => Ok((
            StatusCode::CREATED,
            Json(AuthResponse {
                token,
                user: UserResponse::from(&user),
            }),
        )),
        Err(e) => Err(error_reply(e)),
    }
}

/// Login handler
async fn login_handler(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.service.login(request) {
        Ok((user, token)) => Ok(Json(AuthResponse {
            token,
            user: UserResponse::from(&user),
        })),
        Err(e) => Err(error_reply(e)),
    }
}
