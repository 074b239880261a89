//! Sitter profile HTTP handlers.
//!
//! - POST /api/v1/sitter-profiles - Create the caller's profile
//! - GET /api/v1/sitter-profiles - Search profiles (`?city=&service=`)
//! - GET /api/v1/sitter-profiles/me - The caller's profile
//! - GET /api/v1/sitter-profiles/{id} - One profile
//! - PATCH /api/v1/sitter-profiles/{id} - Update the caller's profile
//! - POST /api/v1/sitter-profiles/{id}/availability - Add a window
//! - GET /api/v1/sitter-profiles/{id}/availability - List windows
//! - DELETE /api/v1/sitter-profiles/{id}/availability/{availability_id} - Remove a window
//! - GET /api/v1/sitter-profiles/{id}/slots - Free bookable slots
//! - GET /api/v1/sitter-profiles/{id}/reviews - Reviews

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        review::Review,
        sitter_profile::{
            Availability, AvailabilityQuery, CreateAvailabilityRequest,
            CreateSitterProfileRequest, SitterProfile, SitterProfileFilter, SitterProfileSummary,
            SlotsQuery, UpdateSitterProfileRequest,
        },
    },
    services::{review_service, scheduling::Interval, sitter_service},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Create a sitter profile.
///
/// # Response
///
/// - **201 Created**: the profile
/// - **403**: caller is not a sitter
/// - **409**: caller already has a profile
pub async fn create_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateSitterProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = sitter_service::create_profile(&state.pool, &auth, request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Search sitter profiles.
///
/// Best rated first; unreviewed sitters last.
pub async fn list_profiles(
    State(state): State<AppState>,
    Query(filter): Query<SitterProfileFilter>,
) -> Result<Json<Vec<SitterProfileSummary>>, AppError> {
    Ok(Json(sitter_service::list_profiles(&state.pool, filter).await?))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<SitterProfile>, AppError> {
    Ok(Json(sitter_service::get_profile(&state.pool, profile_id).await?))
}

pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<SitterProfile>, AppError> {
    Ok(Json(sitter_service::get_my_profile(&state.pool, &auth).await?))
}

/// Partially update a profile. Only its sitter may do this (403 otherwise).
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(profile_id): Path<Uuid>,
    Json(request): Json<UpdateSitterProfileRequest>,
) -> Result<Json<SitterProfile>, AppError> {
    let profile = sitter_service::update_profile(&state.pool, &auth, profile_id, request).await?;
    Ok(Json(profile))
}

/// Add an availability window.
///
/// # Request Body
///
/// ```json
/// {
///   "start_at": "2026-11-02T08:00:00Z",
///   "end_at": "2026-11-02T18:00:00Z"
/// }
/// ```
pub async fn add_availability(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(profile_id): Path<Uuid>,
    Json(request): Json<CreateAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let window =
        sitter_service::add_availability(&state.pool, &auth, profile_id, request).await?;
    Ok((StatusCode::CREATED, Json(window)))
}

pub async fn list_availability(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<Availability>>, AppError> {
    let windows = sitter_service::list_availability(&state.pool, profile_id, query).await?;
    Ok(Json(windows))
}

pub async fn delete_availability(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((profile_id, availability_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    sitter_service::delete_availability(&state.pool, &auth, profile_id, availability_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Free slots for booking.
///
/// # Query
///
/// `?from=2026-11-02T00:00:00Z&to=2026-11-03T00:00:00Z&duration_minutes=60&step_minutes=30`
///
/// # Response (200)
///
/// ```json
/// [
///   { "start": "2026-11-02T08:00:00Z", "end": "2026-11-02T09:00:00Z" },
///   { "start": "2026-11-02T08:30:00Z", "end": "2026-11-02T09:30:00Z" }
/// ]
/// ```
pub async fn list_slots(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<Interval>>, AppError> {
    let slots =
        sitter_service::free_slots(&state.pool, profile_id, query, state.min_booking_minutes)
            .await?;
    Ok(Json(slots))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(review_service::list_for_sitter(&state.pool, profile_id).await?))
}
