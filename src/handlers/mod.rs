//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, query string)
//! 2. Delegates to a service or runs a single query
//! 3. Returns a JSON response or an `AppError`

/// Register, login and current user
pub mod auth;
/// Per-visit chat messages
pub mod chats;
/// Liveness and database connectivity
pub mod health;
/// In-app notifications
pub mod notifications;
/// Owner pets
pub mod pets;
/// Sitter profiles, availability, slots and reviews
pub mod sitter_profiles;
/// Bookings, status workflow, photos and reviews
pub mod visits;
