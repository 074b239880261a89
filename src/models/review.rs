//! Review data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a review record from the database.
///
/// # Database Table
///
/// Maps to `reviews`. `visit_id` is unique: one review per completed visit.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub sitter_profile_id: Uuid,
    pub owner_id: Uuid,

    /// 1 to 5 stars
    pub rating: i16,

    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/v1/visits/{id}/review`.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i16,
    pub comment: Option<String>,
}
