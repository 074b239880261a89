//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request and response bodies built around them.

/// Visit chats and their messages
pub mod chat;
/// In-app notifications
pub mod notification;
/// Pets belonging to owners
pub mod pet;
/// Reviews of completed visits
pub mod review;
/// Sitter listings and availability
pub mod sitter_profile;
/// Visit payments and refunds
pub mod transaction;
/// Users and authentication payloads
pub mod user;
/// Visits and the status workflow
pub mod visit;
