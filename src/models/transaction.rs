//! Payment ledger models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of money for a visit. Stored as the Postgres enum
/// `transaction_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Owner paid for an accepted visit
    Payment,
    /// A paid visit was canceled
    Refund,
}

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to `transactions`. Rows are written by status changes, never by
/// clients, and a visit has at most one row of each kind.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub owner_id: Uuid,
    pub sitter_profile_id: Uuid,
    pub kind: TransactionKind,

    /// Amount in cents, always positive
    pub amount_cents: i64,

    /// Currency code (ISO 4217)
    pub currency: String,

    pub created_at: DateTime<Utc>,
}
