//! Visit service - booking, status workflow and visit photos.
//!
//! This service handles:
//! - Booking validation (ownership, timing, availability, conflicts)
//! - Idempotent booking creation
//! - Guarded status transitions
//! - Photo uploads by the sitter
//!
//! # Consistency
//!
//! Booking runs in one database transaction holding a `FOR UPDATE` lock on
//! the sitter profile row, so two bookings for the same sitter are checked
//! and inserted one after the other. Status changes are compare-and-set on
//! the current status: of two concurrent updates only one succeeds.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        sitter_profile::SitterProfile,
        visit::{
            CreateVisitPhotoRequest, CreateVisitRequest, Party, Visit, VisitFilter, VisitPhoto,
            VisitScope, VisitStatus, VisitWithSitter,
        },
    },
    services::{
        notification_service,
        scheduling::{self, Interval},
        sitter_service, transaction_service,
    },
};

const MAX_PHOTO_URL_LEN: usize = 2048;

/// Outcome of a booking request.
#[derive(Debug)]
pub enum Booking {
    Created(Visit),
    /// An earlier request with the same idempotency key
    Replayed(Visit),
}

/// Check the requested interval against timing rules.
fn validate_booking_window(
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    now: DateTime<Utc>,
    min_minutes: i64,
) -> Result<Interval, AppError> {
    let interval = Interval::new(start_at, end_at)
        .ok_or_else(|| AppError::InvalidRequest("end_at must be after start_at".to_string()))?;

    if interval.start <= now {
        return Err(AppError::InvalidRequest(
            "visits must start in the future".to_string(),
        ));
    }
    if interval.duration() < Duration::minutes(min_minutes) {
        return Err(AppError::InvalidRequest(format!(
            "visits must last at least {min_minutes} minutes"
        )));
    }

    Ok(interval)
}

/// Book a visit with a sitter.
///
/// # Process
///
/// 1. Return the earlier visit if the idempotency key was already used
/// 2. Validate timing
/// 3. Start a transaction, lock the pet and the sitter profile
/// 4. Require availability coverage and no overlapping open visit
/// 5. Insert the visit priced from the sitter's rate
/// 6. Notify the sitter and commit
///
/// # Errors
///
/// - `Forbidden`: caller is not an owner
/// - `InvalidRequest`: bad interval, past start, too short
/// - `NotFound`: pet not owned by caller, or unknown sitter profile
/// - `Conflict`: outside availability or overlapping another visit
pub async fn create_visit(
    pool: &DbPool,
    auth: &AuthContext,
    min_booking_minutes: i64,
    request: CreateVisitRequest,
) -> Result<Booking, AppError> {
    auth.require_owner()?;

    let idempotency_key = request
        .idempotency_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string);

    if let Some(ref key) = idempotency_key {
        if let Some(existing) = sqlx::query_as::<_, Visit>(
            "SELECT * FROM visits WHERE owner_id = $1 AND idempotency_key = $2",
        )
        .bind(auth.user_id)
        .bind(key)
        .fetch_optional(pool)
        .await?
        {
            return Ok(Booking::Replayed(existing));
        }
    }

    let candidate = validate_booking_window(
        request.start_at,
        request.end_at,
        Utc::now(),
        min_booking_minutes,
    )?;

    let mut tx = pool.begin().await?;

    // Shared lock: the pet cannot be deleted under us
    let pet_id: Uuid =
        sqlx::query_scalar("SELECT id FROM pets WHERE id = $1 AND owner_id = $2 FOR SHARE")
            .bind(request.pet_id)
            .bind(auth.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("Pet"))?;

    // Serializes bookings per sitter
    let profile = sqlx::query_as::<_, SitterProfile>(
        "SELECT * FROM sitter_profiles WHERE id = $1 FOR UPDATE",
    )
    .bind(request.sitter_profile_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Sitter profile"))?;

    let availability =
        sitter_service::availability_intervals(&mut *tx, profile.id, &candidate).await?;
    if !scheduling::covered(&candidate, &availability) {
        tx.rollback().await?;
        return Err(AppError::Conflict(
            "sitter is not available for the whole visit".to_string(),
        ));
    }

    let busy = sitter_service::busy_intervals(&mut *tx, profile.id, &candidate).await?;
    let clashes = scheduling::conflicts(&candidate, &busy);
    if !clashes.is_empty() {
        tx.rollback().await?;
        return Err(AppError::Conflict(format!(
            "sitter already has {} visit(s) in that time",
            clashes.len()
        )));
    }

    let total_price_cents = scheduling::price_cents(&candidate, profile.hourly_rate_cents)
        .ok_or_else(|| AppError::InvalidRequest("visit is too long to price".to_string()))?;

    let visit = sqlx::query_as::<_, Visit>(
        r#"
        INSERT INTO visits (
            owner_id,
            sitter_profile_id,
            pet_id,
            start_at,
            end_at,
            status,
            notes,
            total_price_cents,
            idempotency_key
        )
        VALUES ($1, $2, $3, $4, $5, 'PENDING', $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(auth.user_id)
    .bind(profile.id)
    .bind(pet_id)
    .bind(candidate.start)
    .bind(candidate.end)
    .bind(request.notes)
    .bind(total_price_cents)
    .bind(idempotency_key)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::from_db(e, "A visit with this idempotency key already exists"))?;

    notification_service::notify(
        &mut *tx,
        profile.user_id,
        "visit_requested",
        Some(visit.id),
        &format!(
            "New visit request for {}",
            visit.start_at.format("%Y-%m-%d %H:%M UTC")
        ),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        visit_id = %visit.id,
        owner_id = %auth.user_id,
        sitter_profile_id = %profile.id,
        total_price_cents,
        "visit booked"
    );

    Ok(Booking::Created(visit))
}

/// Load a visit with its sitter's user id.
pub async fn load_visit(pool: &DbPool, visit_id: Uuid) -> Result<VisitWithSitter, AppError> {
    sqlx::query_as::<_, VisitWithSitter>(
        r#"
        SELECT v.*, p.user_id AS sitter_user_id
        FROM visits v
        JOIN sitter_profiles p ON p.id = v.sitter_profile_id
        WHERE v.id = $1
        "#,
    )
    .bind(visit_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Visit"))
}

/// Load a visit and the caller's side of it.
///
/// Non-participants get 404, not 403.
pub async fn load_for_participant(
    pool: &DbPool,
    auth: &AuthContext,
    visit_id: Uuid,
) -> Result<(VisitWithSitter, Party), AppError> {
    let loaded = load_visit(pool, visit_id).await?;
    let party = auth
        .party_in(loaded.visit.owner_id, loaded.sitter_user_id)
        .ok_or(AppError::NotFound("Visit"))?;
    Ok((loaded, party))
}

/// Get a visit the caller takes part in.
pub async fn get_visit(pool: &DbPool, auth: &AuthContext, visit_id: Uuid) -> Result<Visit, AppError> {
    let (loaded, _) = load_for_participant(pool, auth, visit_id).await?;
    Ok(loaded.visit)
}

/// List the caller's visits, latest start first.
///
/// Without a scope both sides are included.
pub async fn list_visits(
    pool: &DbPool,
    auth: &AuthContext,
    filter: VisitFilter,
) -> Result<Vec<Visit>, AppError> {
    let scope = filter.scope.map(|s| match s {
        VisitScope::Owner => "owner",
        VisitScope::Sitter => "sitter",
    });

    let visits = sqlx::query_as::<_, Visit>(
        r#"
        SELECT v.*
        FROM visits v
        JOIN sitter_profiles p ON p.id = v.sitter_profile_id
        WHERE (
                ($2::text IS NULL AND (v.owner_id = $1 OR p.user_id = $1))
             OR ($2 = 'owner' AND v.owner_id = $1)
             OR ($2 = 'sitter' AND p.user_id = $1)
          )
          AND ($3::visit_status IS NULL OR v.status = $3)
        ORDER BY v.start_at DESC
        "#,
    )
    .bind(auth.user_id)
    .bind(scope)
    .bind(filter.status)
    .fetch_all(pool)
    .await?;

    Ok(visits)
}

/// Move a visit to a new status.
///
/// # Rules
///
/// - The transition must be in the workflow and belong to the caller's side
/// - `COMPLETED` is only possible once the visit has started
/// - The update only applies if the status is unchanged since it was read
///
/// Paying records a payment and canceling a paid visit records a refund.
/// The other participant is notified.
pub async fn update_status(
    pool: &DbPool,
    auth: &AuthContext,
    visit_id: Uuid,
    to: VisitStatus,
) -> Result<Visit, AppError> {
    let (loaded, party) = load_for_participant(pool, auth, visit_id).await?;
    let from = loaded.visit.status;

    from.check_transition(to, party)?;

    if to == VisitStatus::Completed && loaded.visit.start_at > Utc::now() {
        return Err(AppError::Conflict(
            "a visit cannot be completed before it starts".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let visit = sqlx::query_as::<_, Visit>(
        r#"
        UPDATE visits
        SET status = $2, updated_at = NOW()
        WHERE id = $1 AND status = $3
        RETURNING *
        "#,
    )
    .bind(visit_id)
    .bind(to)
    .bind(from)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        AppError::Conflict("visit status changed concurrently; reload and retry".to_string())
    })?;

    if let Some(kind) = transaction_service::entry_for(from, to) {
        transaction_service::record(&mut *tx, &visit, kind).await?;
    }

    let recipient = match party {
        Party::Owner => loaded.sitter_user_id,
        Party::Sitter => loaded.visit.owner_id,
    };
    notification_service::notify(
        &mut *tx,
        recipient,
        &format!("visit_{}", to.as_str().to_lowercase()),
        Some(visit.id),
        &format!("Visit on {} is now {}", visit.start_at.format("%Y-%m-%d"), to),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(visit_id = %visit.id, %from, %to, "visit status changed");

    Ok(visit)
}

/// Validate a photo URL: http(s) only, bounded length.
fn validate_photo_url(url: &str) -> Result<(), AppError> {
    if url.len() > MAX_PHOTO_URL_LEN {
        return Err(AppError::InvalidRequest(format!(
            "URL exceeds {MAX_PHOTO_URL_LEN} characters"
        )));
    }

    let parsed = url::Url::parse(url)
        .map_err(|_| AppError::InvalidRequest("Invalid URL format".to_string()))?;

    match parsed.scheme() {
        "https" | "http" if parsed.host_str().is_some() => Ok(()),
        _ => Err(AppError::InvalidRequest(
            "URL must use HTTP or HTTPS".to_string(),
        )),
    }
}

/// Attach a photo to a visit. Sitter only, once the visit is accepted.
pub async fn add_photo(
    pool: &DbPool,
    auth: &AuthContext,
    visit_id: Uuid,
    request: CreateVisitPhotoRequest,
) -> Result<VisitPhoto, AppError> {
    let url = request.url.trim();
    validate_photo_url(url)?;

    let (loaded, party) = load_for_participant(pool, auth, visit_id).await?;
    if party != Party::Sitter {
        return Err(AppError::Forbidden(
            "only the sitter can add visit photos".to_string(),
        ));
    }
    if !loaded.visit.status.accepts_photos() {
        return Err(AppError::Conflict(format!(
            "photos cannot be added to a {} visit",
            loaded.visit.status
        )));
    }

    let mut tx = pool.begin().await?;

    let photo = sqlx::query_as::<_, VisitPhoto>(
        r#"
        INSERT INTO visit_photos (visit_id, url, caption)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(visit_id)
    .bind(url)
    .bind(request.caption)
    .fetch_one(&mut *tx)
    .await?;

    notification_service::notify(
        &mut *tx,
        loaded.visit.owner_id,
        "visit_photo_added",
        Some(visit_id),
        "Your sitter shared a new photo",
    )
    .await?;

    tx.commit().await?;

    tracing::info!(visit_id = %visit_id, photo_id = %photo.id, "visit photo added");

    Ok(photo)
}

/// Photos of a visit, oldest first.
pub async fn list_photos(
    pool: &DbPool,
    auth: &AuthContext,
    visit_id: Uuid,
) -> Result<Vec<VisitPhoto>, AppError> {
    load_for_participant(pool, auth, visit_id).await?;

    let photos = sqlx::query_as::<_, VisitPhoto>(
        "SELECT * FROM visit_photos WHERE visit_id = $1 ORDER BY created_at",
    )
    .bind(visit_id)
    .fetch_all(pool)
    .await?;

    Ok(photos)
}
