//! Sitter profile service.
//!
//! This service handles:
//! - Profile creation and updates (one profile per sitter)
//! - Profile search with review statistics
//! - Availability windows
//! - Free slot computation from availability minus booked visits

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::sitter_profile::{
        Availability, AvailabilityQuery, CreateAvailabilityRequest, CreateSitterProfileRequest,
        SitterProfile, SitterProfileFilter, SitterProfileSummary, SlotsQuery,
        UpdateSitterProfileRequest,
    },
    services::scheduling::{self, Interval},
};

/// Longest range a single slot query may cover.
const MAX_SLOT_WINDOW_DAYS: i64 = 31;
const MAX_SLOT_MINUTES: i64 = MAX_SLOT_WINDOW_DAYS * 24 * 60;

/// Upper bound on a sitter's rate (10 000.00 per hour).
pub const MAX_HOURLY_RATE_CENTS: i64 = 1_000_000;

fn validate_profile_fields(
    city: Option<&str>,
    hourly_rate_cents: Option<i64>,
    services: Option<&[String]>,
) -> Result<(), AppError> {
    if city.is_some_and(|c| c.trim().is_empty()) {
        return Err(AppError::InvalidRequest("city must not be empty".to_string()));
    }
    if hourly_rate_cents.is_some_and(|rate| rate <= 0 || rate > MAX_HOURLY_RATE_CENTS) {
        return Err(AppError::InvalidRequest(format!(
            "hourly_rate_cents must be between 1 and {MAX_HOURLY_RATE_CENTS}"
        )));
    }
    if services.is_some_and(|s| s.iter().any(|name| name.trim().is_empty())) {
        return Err(AppError::InvalidRequest(
            "service names must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Lowercase, trim and deduplicate service names.
fn normalize_services(services: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = services.iter().map(|s| s.trim().to_lowercase()).collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Create the caller's sitter profile.
///
/// # Errors
///
/// - `Forbidden`: caller is not a sitter
/// - `InvalidRequest`: empty city, rate out of range
/// - `Conflict`: caller already has a profile
pub async fn create_profile(
    pool: &DbPool,
    auth: &AuthContext,
    request: CreateSitterProfileRequest,
) -> Result<SitterProfile, AppError> {
    auth.require_sitter()?;
    validate_profile_fields(
        Some(request.city.as_str()),
        Some(request.hourly_rate_cents),
        Some(request.services.as_slice()),
    )?;

    let profile = sqlx::query_as::<_, SitterProfile>(
        r#"
        INSERT INTO sitter_profiles (user_id, bio, city, hourly_rate_cents, services)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, bio, city, hourly_rate_cents, services, created_at, updated_at
        "#,
    )
    .bind(auth.user_id)
    .bind(request.bio.trim())
    .bind(request.city.trim())
    .bind(request.hourly_rate_cents)
    .bind(normalize_services(&request.services))
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_db(e, "Sitter profile already exists"))?;

    tracing::info!(profile_id = %profile.id, user_id = %auth.user_id, "sitter profile created");

    Ok(profile)
}

/// Search profiles, best rated first.
pub async fn list_profiles(
    pool: &DbPool,
    filter: SitterProfileFilter,
) -> Result<Vec<SitterProfileSummary>, AppError> {
    let service = filter.service.map(|s| s.trim().to_lowercase());

    let profiles = sqlx::query_as::<_, SitterProfileSummary>(
        r#"
        SELECT p.id, p.user_id, u.full_name, p.bio, p.city, p.hourly_rate_cents, p.services,
               AVG(r.rating)::float8 AS average_rating,
               COUNT(r.id) AS review_count
        FROM sitter_profiles p
        JOIN users u ON u.id = p.user_id
        LEFT JOIN reviews r ON r.sitter_profile_id = p.id
        WHERE ($1::text IS NULL OR LOWER(p.city) = LOWER($1))
          AND ($2::text IS NULL OR $2 = ANY(p.services))
        GROUP BY p.id, u.full_name
        ORDER BY average_rating DESC NULLS LAST, p.created_at DESC
        "#,
    )
    .bind(filter.city.as_deref().map(str::trim))
    .bind(service)
    .fetch_all(pool)
    .await?;

    Ok(profiles)
}

/// Fetch a profile by id.
pub async fn get_profile(pool: &DbPool, profile_id: Uuid) -> Result<SitterProfile, AppError> {
    sqlx::query_as::<_, SitterProfile>(
        r#"
        SELECT id, user_id, bio, city, hourly_rate_cents, services, created_at, updated_at
        FROM sitter_profiles
        WHERE id = $1
        "#,
    )
    .bind(profile_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Sitter profile"))
}

/// Fetch the caller's own profile.
pub async fn get_my_profile(pool: &DbPool, auth: &AuthContext) -> Result<SitterProfile, AppError> {
    sqlx::query_as::<_, SitterProfile>(
        r#"
        SELECT id, user_id, bio, city, hourly_rate_cents, services, created_at, updated_at
        FROM sitter_profiles
        WHERE user_id = $1
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Sitter profile"))
}

/// Fetch a profile and fail with 403 unless the caller owns it.
async fn owned_profile(
    pool: &DbPool,
    auth: &AuthContext,
    profile_id: Uuid,
) -> Result<SitterProfile, AppError> {
    let profile = get_profile(pool, profile_id).await?;
    if profile.user_id != auth.user_id {
        return Err(AppError::Forbidden(
            "only the profile's sitter can change it".to_string(),
        ));
    }
    Ok(profile)
}

/// Partially update the caller's profile.
///
/// A rate change only affects visits booked afterwards.
pub async fn update_profile(
    pool: &DbPool,
    auth: &AuthContext,
    profile_id: Uuid,
    request: UpdateSitterProfileRequest,
) -> Result<SitterProfile, AppError> {
    validate_profile_fields(
        request.city.as_deref(),
        request.hourly_rate_cents,
        request.services.as_deref(),
    )?;
    owned_profile(pool, auth, profile_id).await?;

    let profile = sqlx::query_as::<_, SitterProfile>(
        r#"
        UPDATE sitter_profiles
        SET bio = COALESCE($2, bio),
            city = COALESCE($3, city),
            hourly_rate_cents = COALESCE($4, hourly_rate_cents),
            services = COALESCE($5, services),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, bio, city, hourly_rate_cents, services, created_at, updated_at
        "#,
    )
    .bind(profile_id)
    .bind(request.bio.as_deref().map(str::trim))
    .bind(request.city.as_deref().map(str::trim))
    .bind(request.hourly_rate_cents)
    .bind(request.services.as_deref().map(normalize_services))
    .fetch_one(pool)
    .await?;

    tracing::info!(profile_id = %profile.id, "sitter profile updated");

    Ok(profile)
}

/// Add an availability window to the caller's profile.
///
/// Overlapping windows are allowed and merged when read.
pub async fn add_availability(
    pool: &DbPool,
    auth: &AuthContext,
    profile_id: Uuid,
    request: CreateAvailabilityRequest,
) -> Result<Availability, AppError> {
    Interval::new(request.start_at, request.end_at).ok_or_else(|| {
        AppError::InvalidRequest("end_at must be after start_at".to_string())
    })?;
    if request.end_at <= Utc::now() {
        return Err(AppError::InvalidRequest(
            "availability must end in the future".to_string(),
        ));
    }
    owned_profile(pool, auth, profile_id).await?;

    let availability = sqlx::query_as::<_, Availability>(
        r#"
        INSERT INTO sitter_availability (sitter_profile_id, start_at, end_at)
        VALUES ($1, $2, $3)
        RETURNING id, sitter_profile_id, start_at, end_at
        "#,
    )
    .bind(profile_id)
    .bind(request.start_at)
    .bind(request.end_at)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        profile_id = %profile_id,
        availability_id = %availability.id,
        "availability added"
    );

    Ok(availability)
}

/// List a profile's availability windows, optionally within a range.
pub async fn list_availability(
    pool: &DbPool,
    profile_id: Uuid,
    query: AvailabilityQuery,
) -> Result<Vec<Availability>, AppError> {
    get_profile(pool, profile_id).await?;

    let windows = sqlx::query_as::<_, Availability>(
        r#"
        SELECT id, sitter_profile_id, start_at, end_at
        FROM sitter_availability
        WHERE sitter_profile_id = $1
          AND ($2::timestamptz IS NULL OR end_at > $2)
          AND ($3::timestamptz IS NULL OR start_at < $3)
        ORDER BY start_at
        "#,
    )
    .bind(profile_id)
    .bind(query.from)
    .bind(query.to)
    .fetch_all(pool)
    .await?;

    Ok(windows)
}

/// Remove one of the caller's availability windows.
///
/// Visits already booked in that window are unaffected.
pub async fn delete_availability(
    pool: &DbPool,
    auth: &AuthContext,
    profile_id: Uuid,
    availability_id: Uuid,
) -> Result<(), AppError> {
    owned_profile(pool, auth, profile_id).await?;

    let result =
        sqlx::query("DELETE FROM sitter_availability WHERE id = $1 AND sitter_profile_id = $2")
            .bind(availability_id)
            .bind(profile_id)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Availability window"));
    }

    Ok(())
}

/// Availability intervals overlapping `window`.
pub async fn availability_intervals<'e, E>(
    executor: E,
    profile_id: Uuid,
    window: &Interval,
) -> Result<Vec<Interval>, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, Availability>(
        r#"
        SELECT id, sitter_profile_id, start_at, end_at
        FROM sitter_availability
        WHERE sitter_profile_id = $1 AND end_at > $2 AND start_at < $3
        "#,
    )
    .bind(profile_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(executor)
    .await?;

    Ok(rows.iter().filter_map(Availability::interval).collect())
}

/// Intervals of calendar-blocking visits overlapping `window`.
pub async fn busy_intervals<'e, E>(
    executor: E,
    profile_id: Uuid,
    window: &Interval,
) -> Result<Vec<Interval>, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT start_at, end_at
        FROM visits
        WHERE sitter_profile_id = $1
          AND status IN ('PENDING', 'ACCEPTED', 'PAID')
          AND end_at > $2 AND start_at < $3
        "#,
    )
    .bind(profile_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(start, end)| Interval::new(start, end))
        .collect())
}

/// Validate a slot query and turn it into (window, duration, step).
///
/// Windows that end before `now` are rejected, as are slots shorter than a
/// bookable visit.
fn slot_parameters(
    query: &SlotsQuery,
    now: DateTime<Utc>,
    min_booking_minutes: i64,
) -> Result<(Interval, Duration, Duration), AppError> {
    if !(1..=MAX_SLOT_MINUTES).contains(&query.duration_minutes) {
        return Err(AppError::InvalidRequest(format!(
            "duration_minutes must be between 1 and {MAX_SLOT_MINUTES}"
        )));
    }
    if query.duration_minutes < min_booking_minutes {
        return Err(AppError::InvalidRequest(format!(
            "visits must last at least {min_booking_minutes} minutes"
        )));
    }
    let step_minutes = query.step_minutes.unwrap_or(query.duration_minutes);
    if !(1..=MAX_SLOT_MINUTES).contains(&step_minutes) {
        return Err(AppError::InvalidRequest(format!(
            "step_minutes must be between 1 and {MAX_SLOT_MINUTES}"
        )));
    }

    let window = Interval::new(query.from, query.to)
        .ok_or_else(|| AppError::InvalidRequest("to must be after from".to_string()))?;
    if window.duration() > Duration::days(MAX_SLOT_WINDOW_DAYS) {
        return Err(AppError::InvalidRequest(format!(
            "slot queries may span at most {MAX_SLOT_WINDOW_DAYS} days"
        )));
    }
    if window.end <= now {
        return Err(AppError::InvalidRequest("window lies in the past".to_string()));
    }

    Ok((
        window,
        Duration::minutes(query.duration_minutes),
        Duration::minutes(step_minutes),
    ))
}

/// Bookable slots for a sitter within a window.
///
/// Free time is availability minus every pending, accepted or paid visit.
/// Slots are aligned to the start of each free interval; those already
/// started are dropped.
pub async fn free_slots(
    pool: &DbPool,
    profile_id: Uuid,
    query: SlotsQuery,
    min_booking_minutes: i64,
) -> Result<Vec<Interval>, AppError> {
    let now = Utc::now();
    let (window, duration, step) = slot_parameters(&query, now, min_booking_minutes)?;
    get_profile(pool, profile_id).await?;

    let availability = availability_intervals(pool, profile_id, &window).await?;
    let busy = busy_intervals(pool, profile_id, &window).await?;

    let free = scheduling::subtract(&scheduling::clip(&availability, &window), &busy);
    Ok(scheduling::slots(&free, duration, step)
        .into_iter()
        .filter(|slot| slot.start > now)
        .collect())
}
