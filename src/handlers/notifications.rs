//! Notification HTTP handlers.
//!
//! - GET /api/v1/notifications - The caller's notifications (`?unread_only=true`)
//! - POST /api/v1/notifications/{id}/read - Mark one as read

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::notification::{Notification, NotificationFilter},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

/// List the caller's notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(filter): Query<NotificationFilter>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT *
        FROM notifications
        WHERE user_id = $1 AND (NOT $2 OR is_read = false)
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth.user_id)
    .bind(filter.unread_only)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(notifications))
}

/// Mark a notification as read.
///
/// Returns 404 if it does not exist or belongs to someone else. Marking an
/// already-read notification is a no-op.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    let notification = sqlx::query_as::<_, Notification>(
        r#"
        UPDATE notifications
        SET is_read = true
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(notification_id)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Notification"))?;

    Ok(Json(notification))
}
