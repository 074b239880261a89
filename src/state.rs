//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::{config::Config, db::DbPool, services::auth_service::TokenKeys};

/// State shared by all routes via `State<AppState>`.
///
/// Cloning is cheap: the pool is reference counted and the keys sit behind
/// an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub tokens: Arc<TokenKeys>,

    /// Shortest bookable visit, in minutes
    pub min_booking_minutes: i64,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Self {
        Self {
            pool,
            tokens: Arc::new(TokenKeys::new(&config.jwt_secret, config.jwt_ttl_hours)),
            min_booking_minutes: config.min_booking_minutes,
        }
    }
}
