/// Authentication and authorization utilities
///
/// This module provides the secure authentication primitives for GiveHub:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer-token extraction and the per-request
///   [`middleware::AuthContext`]
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with a fixed 1-day expiration
/// - **Constant-time Comparison**: Password verification uses constant-time
///   operations
///
/// # Example
///
/// ```no_run
/// use givehub_shared::auth::password::{hash_password, verify_password};
/// use givehub_shared::auth::jwt::{create_token, Claims};
/// use givehub_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Token generation
/// let claims = Claims::new(Uuid::new_v4(), "user@example.com", UserRole::Donor, false);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
