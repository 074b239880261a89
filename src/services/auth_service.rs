//! Authentication service: password hashing, token issuance and the
//! register/login flows.
//!
//! Passwords are stored as Argon2 PHC strings. Tokens are HS256 JWTs whose
//! `sub` claim is the user id.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::user::{AuthResponse, LoginRequest, RegisterRequest, Role, User},
};

const MIN_PASSWORD_LEN: usize = 8;

/// Claims carried by every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys plus the token lifetime.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Sign a token for `user_id`, returning it with its expiry.
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Token(e.to_string()))?;

        Ok((token, expires_at))
    }

    /// Verify signature and expiry.
    ///
    /// # Errors
    ///
    /// Any decoding failure is reported as `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Expired means expired
        validation.leeway = 0;

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!(error = %e, "token rejected");
                AppError::Unauthorized
            })
    }
}

/// Hash a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Normalize and validate a registration request.
///
/// Returns the lowercased email.
fn validate_registration(request: &RegisterRequest) -> Result<String, AppError> {
    let email = request.email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => {
            return Err(AppError::InvalidRequest(
                "A valid email address is required".to_string(),
            ));
        }
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if request.full_name.trim().is_empty() {
        return Err(AppError::InvalidRequest("Full name is required".to_string()));
    }

    Ok(email)
}

/// Register a new user and issue a token.
///
/// # Errors
///
/// - `InvalidRequest`: malformed email, short password, empty name
/// - `Conflict`: email already registered
pub async fn register(
    pool: &DbPool,
    keys: &TokenKeys,
    request: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let email = validate_registration(&request)?;
    let password_hash = hash_password(&request.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, full_name, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, password_hash, full_name, role, created_at, updated_at
        "#,
    )
    .bind(&email)
    .bind(&password_hash)
    .bind(request.full_name.trim())
    .bind(request.role)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_db(e, "Email is already registered"))?;

    tracing::info!(user_id = %user.id, role = ?user.role, "user registered");

    session_for(keys, user)
}

/// Authenticate by email and password.
///
/// Unknown email and wrong password produce the same `Unauthorized` error.
pub async fn login(
    pool: &DbPool,
    keys: &TokenKeys,
    request: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let email = request.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, full_name, role, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(&email)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::Unauthorized)?;

    if !verify_password(&request.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::Unauthorized);
    }

    tracing::info!(user_id = %user.id, "user logged in");

    session_for(keys, user)
}

/// Fetch a user by id.
pub async fn get_user(pool: &DbPool, user_id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, full_name, role, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("User"))
}

fn session_for(keys: &TokenKeys, user: User) -> Result<AuthResponse, AppError> {
    let (token, expires_at) = keys.issue(user.id, user.role)?;
    Ok(AuthResponse {
        token,
        token_type: "Bearer",
        expires_at,
        user: user.into(),
    })
}
