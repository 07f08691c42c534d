/// JWT token generation and validation module
///
/// This module provides the bearer tokens used for user authentication.
/// Tokens are signed using HS256 (HMAC-SHA256) and carry the caller's
/// identity and role.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Fixed at 1 day
/// - **Validation**: Signature, expiration, and issuer checks
/// - **Secret Management**: The secret must be at least 32 bytes and is
///   supplied via environment configuration
///
/// # Example
///
/// ```
/// use givehub_shared::auth::jwt::{create_token, validate_token, Claims};
/// use givehub_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, "donor@example.com", UserRole::Donor, false);
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Token issuer name embedded in every token
const ISSUER: &str = "givehub";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims structure
///
/// Contains standard JWT claims plus the GiveHub identity claims that every
/// protected route reads after verification.
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "givehub")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp (1 day after issue)
///
/// # Custom Claims
///
/// - `email`: The user's email address
/// - `role`: The user's role (`ngo` or `donor`)
/// - `is_admin`: True administrative privilege (distinct from the
///   fundraiser role)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "givehub"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// User email (custom claim)
    pub email: String,

    /// User role (custom claim)
    pub role: UserRole,

    /// Administrative privilege (custom claim)
    pub is_admin: bool,
}

impl Claims {
    /// Token lifetime: every issued token expires 1 day after issue
    pub fn token_ttl() -> Duration {
        Duration::days(1)
    }

    /// Creates new claims expiring in 1 day
    ///
    /// # Example
    ///
    /// ```
    /// use givehub_shared::auth::jwt::Claims;
    /// use givehub_shared::models::user::UserRole;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::new(Uuid::new_v4(), "ngo@example.org", UserRole::Ngo, false);
    /// assert!(!claims.is_expired());
    /// ```
    pub fn new(user_id: Uuid, email: &str, role: UserRole, is_admin: bool) -> Self {
        Self::with_expiration(user_id, email, role, is_admin, Self::token_ttl())
    }

    /// Creates claims with a custom expiration (used by tests)
    pub fn with_expiration(
        user_id: Uuid,
        email: &str,
        role: UserRole,
        is_admin: bool,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            email: email.to_string(),
            role,
            is_admin,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
/// - Issuer is "givehub"
///
/// # Errors
///
/// Returns an error if the signature is invalid, the token has expired, the
/// issuer doesn't match, or the token format is invalid
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, "donor@example.com", UserRole::Donor, false);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "donor@example.com");
        assert_eq!(claims.role, UserRole::Donor);
        assert!(!claims.is_admin);
        assert_eq!(claims.iss, "givehub");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_one_day_expiry() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.c", UserRole::Donor, false);

        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 24 * 60 * 60);
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let secret = "test-secret-key-at-least-32-bytes-long";

        let claims = Claims::new(user_id, "ngo@example.org", UserRole::Ngo, true);
        let token = create_token(&claims, secret).expect("Should create token");

        let validated = validate_token(&token, secret).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.email, "ngo@example.org");
        assert_eq!(validated.role, UserRole::Ngo);
        assert!(validated.is_admin);
        assert_eq!(validated.iss, "givehub");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "a@b.c", UserRole::Donor, false);
        let token = create_token(&claims, "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let secret = "test-secret";

        // Expired an hour ago
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            "a@b.c",
            UserRole::Donor,
            false,
            Duration::seconds(-3600),
        );

        assert!(claims.is_expired());

        let token = create_token(&claims, secret).expect("Should create token");
        let result = validate_token(&token, secret);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not.a.token", "secret");
        assert!(result.is_err());
    }
}
