//! Authentication HTTP handlers.
//!
//! - POST /api/v1/auth/register - Create an account and get a token
//! - POST /api/v1/auth/login - Exchange credentials for a token
//! - GET /api/v1/auth/me - Current user

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::user::{AuthResponse, LoginRequest, RegisterRequest, UserResponse},
    services::auth_service,
    state::AppState,
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

/// Register a new owner or sitter.
///
/// # Request Body
///
/// ```json
/// {
///   "email": "sam@example.com",
///   "password": "correct horse",
///   "full_name": "Sam Rivera",
///   "role": "owner"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: `{ "token", "token_type", "expires_at", "user" }`
/// - **400**: invalid email, short password or empty name
/// - **409**: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = auth_service::register(&state.pool, &state.tokens, request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Log in with email and password.
///
/// Returns 401 for an unknown email and for a wrong password alike.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = auth_service::login(&state.pool, &state.tokens, request).await?;
    Ok(Json(session))
}

/// The authenticated user.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserResponse>, AppError> {
    let user = auth_service::get_user(&state.pool, auth.user_id).await?;
    Ok(Json(user.into()))
}
