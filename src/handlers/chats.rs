//! Visit chat HTTP handlers.
//!
//! - POST /api/v1/visits/{id}/messages - Post a message
//! - GET /api/v1/visits/{id}/messages - The visit's messages

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::chat::{CreateMessageRequest, Message},
    services::chat_service,
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Post a message to a visit's chat.
///
/// # Response
///
/// - **201 Created**: the message
/// - **400**: empty or overlong body
/// - **404**: caller is not a participant of the visit
pub async fn post_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let message = chat_service::post_message(&state.pool, &auth, visit_id, request).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, AppError> {
    Ok(Json(chat_service::list_messages(&state.pool, &auth, visit_id).await?))
}
