//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and the multi-step flows.

pub mod auth_service;
pub mod chat_service;
pub mod notification_service;
pub mod review_service;
pub mod scheduling;
pub mod sitter_service;
pub mod transaction_service;
pub mod visit_service;
