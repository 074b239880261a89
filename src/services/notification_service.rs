//! Notification writes shared by the visit and review flows.

use uuid::Uuid;

use crate::{error::AppError, models::notification::Notification};

/// Record a notification for `user_id`.
///
/// Takes any executor so callers can write it inside their own transaction.
pub async fn notify<'e, E>(
    executor: E,
    user_id: Uuid,
    kind: &str,
    visit_id: Option<Uuid>,
    message: &str,
) -> Result<Notification, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let notification = sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (user_id, kind, visit_id, message)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(visit_id)
    .bind(message)
    .fetch_one(executor)
    .await?;

    tracing::debug!(user_id = %user_id, kind, "notification recorded");

    Ok(notification)
}
