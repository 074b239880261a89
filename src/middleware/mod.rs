//! HTTP middleware components.
//!
//! Middleware run before route handlers and may short-circuit a request
//! (for example, rejecting an unauthenticated call).

/// Bearer token authentication middleware
pub mod auth;
