//! Review service.
//!
//! Owners review sitters once per completed visit.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        review::{CreateReviewRequest, Review},
        visit::{Party, VisitStatus},
    },
    services::{notification_service, sitter_service, visit_service},
};

const MIN_RATING: i16 = 1;
const MAX_RATING: i16 = 5;

fn validate_rating(rating: i16) -> Result<(), AppError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidRequest(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

/// Review a completed visit.
///
/// # Errors
///
/// - `InvalidRequest`: rating outside 1..=5
/// - `NotFound`: caller is not on the visit
/// - `Forbidden`: caller is the visit's sitter
/// - `Conflict`: visit not completed, or already reviewed
pub async fn create_review(
    pool: &DbPool,
    auth: &AuthContext,
    visit_id: Uuid,
    request: CreateReviewRequest,
) -> Result<Review, AppError> {
    validate_rating(request.rating)?;

    let (loaded, party) = visit_service::load_for_participant(pool, auth, visit_id).await?;
    if party != Party::Owner {
        return Err(AppError::Forbidden(
            "only the pet owner can review a visit".to_string(),
        ));
    }
    if loaded.visit.status != VisitStatus::Completed {
        return Err(AppError::Conflict(
            "only completed visits can be reviewed".to_string(),
        ));
    }

    let comment = request
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let mut tx = pool.begin().await?;

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (visit_id, sitter_profile_id, owner_id, rating, comment)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(visit_id)
    .bind(loaded.visit.sitter_profile_id)
    .bind(auth.user_id)
    .bind(request.rating)
    .bind(comment)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::from_db(e, "This visit has already been reviewed"))?;

    notification_service::notify(
        &mut *tx,
        loaded.sitter_user_id,
        "review_received",
        Some(visit_id),
        &format!("You received a {}-star review", review.rating),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        review_id = %review.id,
        visit_id = %visit_id,
        rating = review.rating,
        "review created"
    );

    Ok(review)
}

/// Reviews of a sitter profile, newest first.
pub async fn list_for_sitter(pool: &DbPool, profile_id: Uuid) -> Result<Vec<Review>, AppError> {
    sitter_service::get_profile(pool, profile_id).await?;

    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE sitter_profile_id = $1 ORDER BY created_at DESC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}
