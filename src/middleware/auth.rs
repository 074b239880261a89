//! Bearer token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the token from the `Authorization: Bearer <jwt>` header
//! 2. Verify its signature and expiry
//! 3. Inject an [`AuthContext`] into the request extensions
//! 4. Reject anything else with HTTP 401

use crate::{
    error::AppError,
    models::{user::Role, visit::Party},
    state::AppState,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Authentication context attached to authenticated requests.
///
/// Handlers extract it with `Extension<AuthContext>` and use `user_id` to
/// scope every query to the caller.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    /// Fail with 403 unless the caller is a pet owner.
    pub fn require_owner(&self) -> Result<(), AppError> {
        match self.role {
            Role::Owner => Ok(()),
            Role::Sitter => Err(AppError::Forbidden(
                "only pet owners can do this".to_string(),
            )),
        }
    }

    /// Fail with 403 unless the caller is a sitter.
    pub fn require_sitter(&self) -> Result<(), AppError> {
        match self.role {
            Role::Sitter => Ok(()),
            Role::Owner => Err(AppError::Forbidden("only sitters can do this".to_string())),
        }
    }

    /// The caller's side of a visit, if they are on it at all.
    pub fn party_in(&self, owner_id: Uuid, sitter_user_id: Uuid) -> Option<Party> {
        if self.user_id == owner_id {
            Some(Party::Owner)
        } else if self.user_id == sitter_user_id {
            Some(Party::Sitter)
        } else {
            None
        }
    }
}

/// Bearer token authentication middleware function.
///
/// # Flow
///
/// 1. Read the `Authorization` header
/// 2. Strip the `Bearer ` prefix
/// 3. Verify the JWT with the shared keys
/// 4. Insert `AuthContext` and call the next handler
///
/// # Returns
///
/// - `Ok(Response)` from the next handler when the token is valid
/// - `Err(AppError::Unauthorized)` otherwise (401)
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!(path = %request.uri().path(), "missing Authorization header");
            AppError::Unauthorized
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let claims = state.tokens.verify(token)?;

    request.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn role_guards() {
        assert!(ctx(Role::Owner).require_owner().is_ok());
        assert!(matches!(
            ctx(Role::Owner).require_sitter(),
            Err(AppError::Forbidden(_))
        ));
        assert!(ctx(Role::Sitter).require_sitter().is_ok());
        assert!(matches!(
            ctx(Role::Sitter).require_owner(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn party_is_resolved_from_visit_participants() {
        let caller = ctx(Role::Owner);
        let other = Uuid::new_v4();
        assert_eq!(caller.party_in(caller.user_id, other), Some(Party::Owner));
        assert_eq!(caller.party_in(other, caller.user_id), Some(Party::Sitter));
        assert_eq!(caller.party_in(other, Uuid::new_v4()), None);
    }
}
