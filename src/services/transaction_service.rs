//! Transaction service - the payment ledger of a visit.
//!
//! Moving a visit to `PAID` records a payment; canceling a paid visit
//! records a refund of the same amount. Both rows are written inside the
//! status update's database transaction, so the ledger and the visit status
//! never disagree.

use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        transaction::{Transaction, TransactionKind},
        visit::{Visit, VisitStatus},
    },
    services::visit_service,
};

/// The ledger entry a status change produces, if any.
pub fn entry_for(from: VisitStatus, to: VisitStatus) -> Option<TransactionKind> {
    match (from, to) {
        (VisitStatus::Accepted, VisitStatus::Paid) => Some(TransactionKind::Payment),
        (VisitStatus::Paid, VisitStatus::Canceled) => Some(TransactionKind::Refund),
        _ => None,
    }
}

/// Record a ledger row for `visit` at its booked price.
///
/// # Errors
///
/// - `Conflict`: the visit already has a row of this kind
pub async fn record<'e, E>(
    executor: E,
    visit: &Visit,
    kind: TransactionKind,
) -> Result<Transaction, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (visit_id, owner_id, sitter_profile_id, kind, amount_cents)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(visit.id)
    .bind(visit.owner_id)
    .bind(visit.sitter_profile_id)
    .bind(kind)
    .bind(visit.total_price_cents)
    .fetch_one(executor)
    .await
    .map_err(|e| AppError::from_db(e, "Transaction already recorded for this visit"))?;

    tracing::info!(
        transaction_id = %transaction.id,
        visit_id = %visit.id,
        kind = ?kind,
        amount_cents = transaction.amount_cents,
        "transaction recorded"
    );

    Ok(transaction)
}

/// Ledger rows of a visit, oldest first. Owner or sitter only.
pub async fn list_for_visit(
    pool: &DbPool,
    auth: &AuthContext,
    visit_id: Uuid,
) -> Result<Vec<Transaction>, AppError> {
    visit_service::load_for_participant(pool, auth, visit_id).await?;

    let transactions = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE visit_id = $1 ORDER BY created_at",
    )
    .bind(visit_id)
    .fetch_all(pool)
    .await?;

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_and_refund_follow_the_paid_status() {
        use VisitStatus::*;
        assert_eq!(entry_for(Accepted, Paid), Some(TransactionKind::Payment));
        assert_eq!(entry_for(Paid, Canceled), Some(TransactionKind::Refund));
    }

    #[test]
    fn other_transitions_move_no_money() {
        use VisitStatus::*;
        for (from, to) in [
            (Pending, Accepted),
            (Pending, Canceled),
            (Accepted, Canceled),
            (Accepted, Completed),
            (Paid, Completed),
        ] {
            assert_eq!(entry_for(from, to), None, "{from} -> {to}");
        }
    }
}
