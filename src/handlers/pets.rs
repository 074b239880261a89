//! Pet management HTTP handlers.
//!
//! This module implements the pet endpoints:
//! - POST /api/v1/pets - Create a pet
//! - GET /api/v1/pets - List the caller's pets
//! - GET /api/v1/pets/{id} - Get one pet
//! - PATCH /api/v1/pets/{id} - Update a pet
//! - DELETE /api/v1/pets/{id} - Delete a pet
//!
//! Every query filters by `owner_id`, so another owner's pet is reported as
//! not found rather than forbidden.

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::pet::{CreatePetRequest, Pet, UpdatePetRequest},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

const MAX_AGE_YEARS: i32 = 50;

fn validate_name(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validate_age(age_years: Option<i32>) -> Result<(), AppError> {
    match age_years {
        Some(age) if !(0..=MAX_AGE_YEARS).contains(&age) => Err(AppError::InvalidRequest(
            format!("age_years must be between 0 and {MAX_AGE_YEARS}"),
        )),
        _ => Ok(()),
    }
}

fn validate_update(request: &UpdatePetRequest) -> Result<(), AppError> {
    if let Some(name) = &request.name {
        validate_name("name", name)?;
    }
    if let Some(species) = &request.species {
        validate_name("species", species)?;
    }
    validate_age(request.age_years)
}

/// Create a pet for the authenticated owner.
///
/// # Response
///
/// - **201 Created**: the new pet
/// - **400**: empty name/species or age out of range
/// - **403**: caller is a sitter
pub async fn create_pet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreatePetRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_owner()?;
    validate_name("name", &request.name)?;
    validate_name("species", &request.species)?;
    validate_age(request.age_years)?;

    let pet = sqlx::query_as::<_, Pet>(
        r#"
        INSERT INTO pets (owner_id, name, species, breed, age_years, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, owner_id, name, species, breed, age_years, notes, created_at, updated_at
        "#,
    )
    .bind(auth.user_id)
    .bind(request.name.trim())
    .bind(request.species.trim())
    .bind(request.breed)
    .bind(request.age_years)
    .bind(request.notes)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(pet_id = %pet.id, owner_id = %auth.user_id, "pet created");

    Ok((StatusCode::CREATED, Json(pet)))
}

/// List the caller's pets, newest first.
pub async fn list_pets(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let pets = sqlx::query_as::<_, Pet>(
        r#"
        SELECT id, owner_id, name, species, breed, age_years, notes, created_at, updated_at
        FROM pets
        WHERE owner_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(pets))
}

/// Get one of the caller's pets.
///
/// Returns 404 if the pet does not exist OR belongs to another owner.
pub async fn get_pet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(pet_id): Path<Uuid>,
) -> Result<Json<Pet>, AppError> {
    let pet = sqlx::query_as::<_, Pet>(
        r#"
        SELECT id, owner_id, name, species, breed, age_years, notes, created_at, updated_at
        FROM pets
        WHERE id = $1 AND owner_id = $2
        "#,
    )
    .bind(pet_id)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Pet"))?;

    Ok(Json(pet))
}

/// Partially update one of the caller's pets.
pub async fn update_pet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(pet_id): Path<Uuid>,
    Json(request): Json<UpdatePetRequest>,
) -> Result<Json<Pet>, AppError> {
    validate_update(&request)?;

    let pet = sqlx::query_as::<_, Pet>(
        r#"
        UPDATE pets
        SET name = COALESCE($3, name),
            species = COALESCE($4, species),
            breed = COALESCE($5, breed),
            age_years = COALESCE($6, age_years),
            notes = COALESCE($7, notes),
            updated_at = NOW()
        WHERE id = $1 AND owner_id = $2
        RETURNING id, owner_id, name, species, breed, age_years, notes, created_at, updated_at
        "#,
    )
    .bind(pet_id)
    .bind(auth.user_id)
    .bind(request.name.as_deref().map(str::trim))
    .bind(request.species.as_deref().map(str::trim))
    .bind(request.breed)
    .bind(request.age_years)
    .bind(request.notes)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Pet"))?;

    Ok(Json(pet))
}

/// Delete one of the caller's pets.
///
/// Refused with 409 while the pet has open visits. Finished visits keep
/// their history with the pet reference cleared.
pub async fn delete_pet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(pet_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.pool.begin().await?;

    // Lock the pet so no visit is booked for it while we check
    let exists: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM pets WHERE id = $1 AND owner_id = $2 FOR UPDATE")
            .bind(pet_id)
            .bind(auth.user_id)
            .fetch_optional(&mut *tx)
            .await?;

    if exists.is_none() {
        tx.rollback().await?;
        return Err(AppError::NotFound("Pet"));
    }

    let open_visits: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM visits WHERE pet_id = $1 AND status IN ('PENDING', 'ACCEPTED', 'PAID')",
    )
    .bind(pet_id)
    .fetch_one(&mut *tx)
    .await?;

    if open_visits > 0 {
        tx.rollback().await?;
        return Err(AppError::Conflict(format!(
            "Pet has {open_visits} open visit(s); cancel them first"
        )));
    }

    sqlx::query("DELETE FROM pets WHERE id = $1")
        .bind(pet_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(pet_id = %pet_id, owner_id = %auth.user_id, "pet deleted");

    Ok(StatusCode::NO_CONTENT)
}
