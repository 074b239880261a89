//! Visit (booking) models and the visit status workflow.
//!
//! This module defines:
//! - `VisitStatus`: the booking lifecycle, with its transition table
//! - `Party`: which side of a visit is acting
//! - `Visit`, `VisitPhoto`: database entities
//! - request types for booking, status changes and photos

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Lifecycle of a visit.
///
/// ```text
/// PENDING  -> ACCEPTED | REJECTED | CANCELED
/// ACCEPTED -> PAID | COMPLETED | CANCELED
/// PAID     -> COMPLETED | CANCELED
/// ```
///
/// `REJECTED`, `COMPLETED` and `CANCELED` are terminal. Stored as the
/// Postgres enum `visit_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "visit_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
    Pending,
    Accepted,
    Rejected,
    Paid,
    Completed,
    Canceled,
}

/// The participant changing a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Owner,
    Sitter,
}

impl VisitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VisitStatus::Pending => "PENDING",
            VisitStatus::Accepted => "ACCEPTED",
            VisitStatus::Rejected => "REJECTED",
            VisitStatus::Paid => "PAID",
            VisitStatus::Completed => "COMPLETED",
            VisitStatus::Canceled => "CANCELED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            VisitStatus::Rejected | VisitStatus::Completed | VisitStatus::Canceled
        )
    }

    /// Whether a visit in this status occupies the sitter's calendar.
    pub fn blocks_calendar(self) -> bool {
        matches!(
            self,
            VisitStatus::Pending | VisitStatus::Accepted | VisitStatus::Paid
        )
    }

    /// Parties allowed to move a visit from `self` to `to`.
    ///
    /// Empty when the transition is not part of the workflow.
    pub fn allowed_parties(self, to: VisitStatus) -> &'static [Party] {
        use VisitStatus::*;
        match (self, to) {
            (Pending, Accepted) | (Pending, Rejected) => &[Party::Sitter],
            (Accepted, Paid) => &[Party::Owner],
            (Accepted, Completed) | (Paid, Completed) => &[Party::Sitter],
            (Pending, Canceled) | (Accepted, Canceled) | (Paid, Canceled) => {
                &[Party::Owner, Party::Sitter]
            }
            _ => &[],
        }
    }

    /// Validate that `party` may move a visit from `self` to `to`.
    ///
    /// # Errors
    ///
    /// - `InvalidStatusTransition` if the pair is not in the workflow
    /// - `Forbidden` if the transition exists but belongs to the other party
    pub fn check_transition(self, to: VisitStatus, party: Party) -> Result<(), AppError> {
        let allowed = self.allowed_parties(to);
        if allowed.is_empty() {
            return Err(AppError::InvalidStatusTransition { from: self, to });
        }
        if !allowed.contains(&party) {
            return Err(AppError::Forbidden(format!(
                "only the {} can set a visit to {}",
                match allowed[0] {
                    Party::Owner => "owner",
                    Party::Sitter => "sitter",
                },
                to
            )));
        }
        Ok(())
    }

    /// Statuses during which the sitter may attach photos.
    pub fn accepts_photos(self) -> bool {
        matches!(
            self,
            VisitStatus::Accepted | VisitStatus::Paid | VisitStatus::Completed
        )
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a visit record from the database.
///
/// # Database Table
///
/// Maps to `visits`. A visit links one owner, one pet (owned by that owner)
/// and one sitter profile over `[start_at, end_at)`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Visit {
    pub id: Uuid,

    pub owner_id: Uuid,

    pub sitter_profile_id: Uuid,

    /// Cleared when the pet is deleted after the visit has finished
    pub pet_id: Option<Uuid>,

    pub start_at: DateTime<Utc>,

    pub end_at: DateTime<Utc>,

    pub status: VisitStatus,

    pub notes: Option<String>,

    /// Price fixed at booking time from the sitter's hourly rate
    pub total_price_cents: i64,

    /// Client-provided key; repeated creates with the same key return this visit
    #[serde(skip_serializing)]
    pub idempotency_key: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// A visit joined with the user id behind its sitter profile.
///
/// Used for participant checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VisitWithSitter {
    #[sqlx(flatten)]
    pub visit: Visit,
    pub sitter_user_id: Uuid,
}

/// Request body for booking a visit.
///
/// ```json
/// {
///   "sitter_profile_id": "550e8400-e29b-41d4-a716-446655440000",
///   "pet_id": "660e8400-e29b-41d4-a716-446655440001",
///   "start_at": "2026-11-02T09:00:00Z",
///   "end_at": "2026-11-02T11:00:00Z",
///   "notes": "Key under the mat",
///   "idempotency_key": "booking-biscuit-1102"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateVisitRequest {
    pub sitter_profile_id: Uuid,
    pub pet_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub idempotency_key: Option<String>,
}

/// Request body for `PATCH /api/v1/visits/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateVisitStatusRequest {
    pub status: VisitStatus,
}

/// Which side of the caller's visits to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitScope {
    Owner,
    Sitter,
}

/// Query string for `GET /api/v1/visits`.
#[derive(Debug, Default, Deserialize)]
pub struct VisitFilter {
    #[serde(rename = "as")]
    pub scope: Option<VisitScope>,
    pub status: Option<VisitStatus>,
}

/// Represents a photo attached to a visit by the sitter.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct VisitPhoto {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for attaching a photo.
#[derive(Debug, Deserialize)]
pub struct CreateVisitPhotoRequest {
    pub url: String,
    pub caption: Option<String>,
}
