//! Visit HTTP handlers.
//!
//! - POST /api/v1/visits - Book a visit
//! - GET /api/v1/visits - List the caller's visits (`?as=owner|sitter&status=`)
//! - GET /api/v1/visits/{id} - One visit
//! - PATCH /api/v1/visits/{id}/status - Accept, reject, pay, complete or cancel
//! - POST /api/v1/visits/{id}/photos - Sitter adds a photo
//! - GET /api/v1/visits/{id}/photos - Visit photos
//! - POST /api/v1/visits/{id}/review - Owner reviews a completed visit
//! - GET /api/v1/visits/{id}/transactions - Payment and refund records

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        review::CreateReviewRequest,
        transaction::Transaction,
        visit::{
            CreateVisitPhotoRequest, CreateVisitRequest, UpdateVisitStatusRequest, Visit,
            VisitFilter, VisitPhoto,
        },
    },
    services::{
        review_service, transaction_service,
        visit_service::{self, Booking},
    },
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Book a visit.
///
/// # Request Body
///
/// ```json
/// {
///   "sitter_profile_id": "550e8400-...",
///   "pet_id": "660e8400-...",
///   "start_at": "2026-11-02T09:00:00Z",
///   "end_at": "2026-11-02T11:00:00Z",
///   "notes": "Key under the mat",
///   "idempotency_key": "booking-001"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: new `PENDING` visit
/// - **200 OK**: the visit created earlier with the same idempotency key
/// - **400**: bad interval
/// - **404**: pet or sitter profile not found
/// - **409**: sitter unavailable or already booked
pub async fn create_visit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateVisitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking =
        visit_service::create_visit(&state.pool, &auth, state.min_booking_minutes, request)
            .await?;

    Ok(match booking {
        Booking::Created(visit) => (StatusCode::CREATED, Json(visit)),
        Booking::Replayed(visit) => (StatusCode::OK, Json(visit)),
    })
}

pub async fn list_visits(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(filter): Query<VisitFilter>,
) -> Result<Json<Vec<Visit>>, AppError> {
    Ok(Json(visit_service::list_visits(&state.pool, &auth, filter).await?))
}

/// Get a visit. Returns 404 unless the caller is its owner or sitter.
pub async fn get_visit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<Visit>, AppError> {
    Ok(Json(visit_service::get_visit(&state.pool, &auth, visit_id).await?))
}

/// Change a visit's status.
///
/// # Request Body
///
/// ```json
/// { "status": "ACCEPTED" }
/// ```
///
/// # Response
///
/// - **200 OK**: updated visit
/// - **403**: the transition belongs to the other participant
/// - **409**: transition not allowed, or status changed concurrently
pub async fn update_visit_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<UpdateVisitStatusRequest>,
) -> Result<Json<Visit>, AppError> {
    let visit = visit_service::update_status(&state.pool, &auth, visit_id, request.status).await?;
    Ok(Json(visit))
}

pub async fn add_photo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<CreateVisitPhotoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let photo = visit_service::add_photo(&state.pool, &auth, visit_id, request).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

pub async fn list_photos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<Vec<VisitPhoto>>, AppError> {
    Ok(Json(visit_service::list_photos(&state.pool, &auth, visit_id).await?))
}

/// Review a completed visit.
///
/// # Request Body
///
/// ```json
/// { "rating": 5, "comment": "Biscuit loved her" }
/// ```
pub async fn create_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let review = review_service::create_review(&state.pool, &auth, visit_id, request).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = transaction_service::list_for_visit(&state.pool, &auth, visit_id).await?;
    Ok(Json(transactions))
}
