//! Visit chat models.
//!
//! Each visit has at most one chat, created with its first message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a message record from the database.
///
/// # Database Table
///
/// Maps to `messages`, which hangs off `chats` (one row per visit).
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,

    /// The owner or the sitter of the visit
    pub sender_id: Uuid,

    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/v1/visits/{id}/messages`.
///
/// ```json
/// { "body": "Biscuit had her walk, all good!" }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub body: String,
}
