//! Pet data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a pet record from the database.
///
/// # Database Table
///
/// Maps to the `pets` table. Every pet belongs to exactly one owner and
/// queries always filter by `owner_id`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Pet {
    pub id: Uuid,

    pub owner_id: Uuid,

    pub name: String,

    /// Free-form species ("dog", "cat", "rabbit", ...)
    pub species: String,

    pub breed: Option<String>,

    pub age_years: Option<i32>,

    /// Care instructions shown to the sitter
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a pet.
///
/// ```json
/// {
///   "name": "Biscuit",
///   "species": "dog",
///   "breed": "Beagle",
///   "age_years": 4,
///   "notes": "Allergic to chicken"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreatePetRequest {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age_years: Option<i32>,
    pub notes: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePetRequest {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub age_years: Option<i32>,
    pub notes: Option<String>,
}
