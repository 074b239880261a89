//! Sitter profile and availability models.
//!
//! This module defines:
//! - `SitterProfile`: a sitter's public listing
//! - `SitterProfileSummary`: listing row joined with review statistics
//! - `Availability`: a concrete window in which the sitter accepts visits
//! - request/query types for profile, availability and slot endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::scheduling::Interval;

/// Represents a sitter profile record from the database.
///
/// # Database Table
///
/// Maps to `sitter_profiles`. `user_id` is unique: one profile per sitter.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SitterProfile {
    pub id: Uuid,

    /// The sitter user who owns this profile
    pub user_id: Uuid,

    pub bio: String,

    pub city: String,

    /// Hourly rate in cents, always positive
    pub hourly_rate_cents: i64,

    /// Offered services ("walking", "boarding", "drop-in", ...)
    pub services: Vec<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Profile listing entry with aggregated review data.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SitterProfileSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub bio: String,
    pub city: String,
    pub hourly_rate_cents: i64,
    pub services: Vec<String>,

    /// `None` until the first review
    pub average_rating: Option<f64>,

    pub review_count: i64,
}

/// Request body for creating a sitter profile.
///
/// ```json
/// {
///   "bio": "Ten years with large dogs",
///   "city": "Portland",
///   "hourly_rate_cents": 2500,
///   "services": ["walking", "drop-in"]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateSitterProfileRequest {
    #[serde(default)]
    pub bio: String,
    pub city: String,
    pub hourly_rate_cents: i64,
    #[serde(default)]
    pub services: Vec<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSitterProfileRequest {
    pub bio: Option<String>,
    pub city: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub services: Option<Vec<String>>,
}

/// Query string for `GET /api/v1/sitter-profiles`.
#[derive(Debug, Default, Deserialize)]
pub struct SitterProfileFilter {
    pub city: Option<String>,
    pub service: Option<String>,
}

/// Represents an availability window from the database.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Availability {
    pub id: Uuid,
    pub sitter_profile_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl Availability {
    pub fn interval(&self) -> Option<Interval> {
        Interval::new(self.start_at, self.end_at)
    }
}

/// Request body for adding an availability window.
#[derive(Debug, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// Optional time range for listing availability.
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Query string for `GET /api/v1/sitter-profiles/{id}/slots`.
///
/// `step_minutes` defaults to `duration_minutes`.
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub duration_minutes: i64,
    pub step_minutes: Option<i64>,
}
