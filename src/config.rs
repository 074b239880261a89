//! Application configuration management.
//!
//! Configuration is read from environment variables (optionally seeded from a
//! `.env` file) and deserialized into a type-safe struct with `envy`.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `JWT_SECRET` (required): HMAC secret used to sign bearer tokens
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `JWT_TTL_HOURS` (optional): token lifetime, defaults to 24
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `MIN_BOOKING_MINUTES` (optional): shortest bookable visit, defaults to 30
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    pub jwt_secret: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_jwt_ttl_hours")]
    pub jwt_ttl_hours: i64,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_min_booking_minutes")]
    pub min_booking_minutes: i64,
}

fn default_port() -> u16 {
    3000
}

fn default_jwt_ttl_hours() -> i64 {
    24
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_booking_minutes() -> i64 {
    30
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing `.env` file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or `JWT_SECRET` is missing, or if a
    /// value cannot be parsed into its expected type.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }
}
