//! Chat service - messages between the owner and the sitter of a visit.
//!
//! The chat row is created on the first message. Only the two participants
//! can read or write it; everyone else gets 404 as for the visit itself.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        chat::{CreateMessageRequest, Message},
        visit::Party,
    },
    services::{notification_service, visit_service},
};

const MAX_MESSAGE_LEN: usize = 4000;

fn validate_body(body: &str) -> Result<&str, AppError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(AppError::InvalidRequest(
            "message must not be empty".to_string(),
        ));
    }
    if body.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::InvalidRequest(format!(
            "message exceeds {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(body)
}

/// Post a message to a visit's chat and notify the other participant.
pub async fn post_message(
    pool: &DbPool,
    auth: &AuthContext,
    visit_id: Uuid,
    request: CreateMessageRequest,
) -> Result<Message, AppError> {
    let body = validate_body(&request.body)?;
    let (loaded, party) = visit_service::load_for_participant(pool, auth, visit_id).await?;

    let mut tx = pool.begin().await?;

    let chat_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO chats (visit_id)
        VALUES ($1)
        ON CONFLICT (visit_id) DO UPDATE SET visit_id = EXCLUDED.visit_id
        RETURNING id
        "#,
    )
    .bind(visit_id)
    .fetch_one(&mut *tx)
    .await?;

    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (chat_id, sender_id, body)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(chat_id)
    .bind(auth.user_id)
    .bind(body)
    .fetch_one(&mut *tx)
    .await?;

    let recipient = match party {
        Party::Owner => loaded.sitter_user_id,
        Party::Sitter => loaded.visit.owner_id,
    };
    notification_service::notify(
        &mut *tx,
        recipient,
        "message_received",
        Some(visit_id),
        "You have a new message",
    )
    .await?;

    tx.commit().await?;

    tracing::info!(visit_id = %visit_id, message_id = %message.id, "message posted");

    Ok(message)
}

/// Messages of a visit's chat, oldest first. Empty until the first message.
pub async fn list_messages(
    pool: &DbPool,
    auth: &AuthContext,
    visit_id: Uuid,
) -> Result<Vec<Message>, AppError> {
    visit_service::load_for_participant(pool, auth, visit_id).await?;

    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT m.*
        FROM messages m
        JOIN chats c ON c.id = m.chat_id
        WHERE c.visit_id = $1
        ORDER BY m.created_at, m.id
        "#,
    )
    .bind(visit_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_bodies_are_trimmed_and_bounded() {
        assert_eq!(validate_body("  on my way  ").unwrap(), "on my way");
        assert!(validate_body("   ").is_err());
        assert!(validate_body(&"x".repeat(MAX_MESSAGE_LEN)).is_ok());
        assert!(validate_body(&"x".repeat(MAX_MESSAGE_LEN + 1)).is_err());
    }
}
