/// Authentication middleware for Axum
///
/// This module provides the bearer-token verification step shared by all
/// protected routes. The middleware extracts the token from the
/// `Authorization` header, validates it, and attaches the decoded identity
/// to request extensions.
///
/// # Request Extensions
///
/// After successful authentication the middleware adds an [`AuthContext`]
/// carrying the caller's id, email, role, and admin flag. Handlers extract
/// it with Axum's `Extension` extractor.
///
/// # Capability checks
///
/// Two distinct checks are exposed and must not be conflated:
///
/// - [`AuthContext::is_fundraiser`]: the caller holds the campaign-privileged
///   role (`ngo`) and may create campaigns
/// - [`AuthContext::is_admin`]: true administrative privilege; overrides
///   ownership checks on campaign update/delete
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use givehub_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::models::user::UserRole;

/// Authentication context added to request extensions
///
/// This is the decoded claim set of the verified bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Authenticated user email
    pub email: String,

    /// User role carried by the token
    pub role: UserRole,

    /// Administrative privilege carried by the token
    pub is_admin: bool,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: &super::jwt::Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
            role: claims.role,
            is_admin: claims.is_admin,
        }
    }

    /// Whether the caller holds the campaign-privileged role
    ///
    /// Gates campaign creation. This is NOT administrative privilege; see
    /// [`AuthContext::is_admin`] for that.
    pub fn is_fundraiser(&self) -> bool {
        self.role == UserRole::Ngo
    }

    /// Whether the caller may mutate a resource owned by `owner`
    ///
    /// Permitted iff the caller is the owner or carries administrative
    /// privilege.
    pub fn can_modify(&self, owner: Uuid) -> bool {
        self.user_id == owner || self.is_admin
    }
}

/// Error type for authentication middleware
///
/// Missing credentials are reported as Unauthorized; a token that is present
/// but fails signature or expiry checks is reported as Forbidden.
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header or empty token
    MissingCredentials,

    /// Header present but not a Bearer token
    InvalidFormat(String),

    /// Token validation failed (bad signature, expired, wrong issuer)
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
        }
    }
}

/// JWT authentication middleware
///
/// Validates bearer tokens from the `Authorization: Bearer <token>` header
/// and injects an [`AuthContext`] into request extensions.
///
/// # Errors
///
/// - Unauthorized if the Authorization header is missing or is not a Bearer
///   token
/// - Forbidden if signature or expiry validation fails
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let auth_context = AuthContext::from_claims(&claims);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Claims;

    fn donor_context() -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            email: "donor@example.com".to_string(),
            role: UserRole::Donor,
            is_admin: false,
        }
    }

    #[test]
    fn test_auth_context_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "ngo@example.org", UserRole::Ngo, false);

        let context = AuthContext::from_claims(&claims);

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.email, "ngo@example.org");
        assert_eq!(context.role, UserRole::Ngo);
        assert!(!context.is_admin);
    }

    #[test]
    fn test_fundraiser_check_is_role_based() {
        let mut context = donor_context();
        assert!(!context.is_fundraiser());

        context.role = UserRole::Ngo;
        assert!(context.is_fundraiser());

        // Admin privilege does not imply the fundraiser role
        context.role = UserRole::Donor;
        context.is_admin = true;
        assert!(!context.is_fundraiser());
    }

    #[test]
    fn test_can_modify_owner() {
        let context = donor_context();
        assert!(context.can_modify(context.user_id));
        assert!(!context.can_modify(Uuid::new_v4()));
    }

    #[test]
    fn test_can_modify_admin_override() {
        let mut context = donor_context();
        context.is_admin = true;
        assert!(context.can_modify(Uuid::new_v4()));
    }

    #[test]
    fn test_auth_error_status_codes() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
