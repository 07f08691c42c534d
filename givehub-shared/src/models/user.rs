/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing
/// accounts. Passwords are stored as Argon2id hashes, never in plaintext,
/// and no exposed operation hard-deletes a user.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('ngo', 'donor');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     first_name VARCHAR(100) NOT NULL,
///     last_name VARCHAR(100),
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     date_of_birth DATE NOT NULL,
///     role user_role NOT NULL DEFAULT 'donor',
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE,
///     reset_token VARCHAR(255),
///     reset_token_expires_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Coarse capability classification of a user
///
/// `Ngo` is the fundraiser-privileged role (may create campaigns); `Donor`
/// is an ordinary contributor. Unknown values are rejected at
/// deserialization, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Fundraiser-privileged role: may create and manage campaigns
    Ngo,

    /// Ordinary contributor
    Donor,
}

impl UserRole {
    /// Role name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Ngo => "ngo",
            UserRole::Donor => "donor",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Donor
    }
}

/// User model representing an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: Option<String>,

    /// Email address (case-insensitive via CITEXT, unique across all users)
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Date of birth
    pub date_of_birth: NaiveDate,

    /// Role (ngo or donor)
    pub role: UserRole,

    /// True administrative privilege
    ///
    /// Distinct from the `ngo` role: admins may mutate campaigns they do not
    /// own, fundraisers may not.
    pub is_admin: bool,

    /// Pending password-reset token, if one was issued
    pub reset_token: Option<String>,

    /// When the reset token expires
    pub reset_token_expires_at: Option<DateTime<Utc>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: Option<String>,

    /// Email address (must be unique)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Date of birth
    pub date_of_birth: NaiveDate,

    /// Role for the new account
    pub role: UserRole,
}

/// Input for updating an existing user
///
/// Explicit optional-field patch: every updatable field is listed, and only
/// non-None fields mutate the stored record. Role and admin flag are not
/// updatable through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New first name
    pub first_name: Option<String>,

    /// New last name
    pub last_name: Option<String>,

    /// New date of birth
    pub date_of_birth: Option<NaiveDate>,

    /// New email address
    pub email: Option<String>,

    /// New password hash (already hashed by the caller)
    pub password_hash: Option<String>,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database is unreachable
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, date_of_birth, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, email, password_hash, date_of_birth,
                      role, is_admin, reset_token, reset_token_expires_at,
                      created_at, updated_at
            "#,
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.date_of_birth)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, date_of_birth,
                   role, is_admin, reset_token, reset_token_expires_at,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Lookup is case-insensitive via the CITEXT column type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, date_of_birth,
                   role, is_admin, reset_token, reset_token_expires_at,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Applies a partial update to an existing user
    ///
    /// Only non-None fields in `data` are written; `updated_at` is bumped
    /// automatically.
    ///
    /// # Returns
    ///
    /// The updated user if found, None if the user doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if the new email already belongs to another user or
    /// the database connection fails
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the UPDATE dynamically from the fields that are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.first_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", first_name = ${}", bind_count));
        }
        if data.last_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", last_name = ${}", bind_count));
        }
        if data.date_of_birth.is_some() {
            bind_count += 1;
            query.push_str(&format!(", date_of_birth = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, first_name, last_name, email, password_hash, \
             date_of_birth, role, is_admin, reset_token, reset_token_expires_at, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(first_name) = data.first_name {
            q = q.bind(first_name);
        }
        if let Some(last_name) = data.last_name {
            q = q.bind(last_name);
        }
        if let Some(date_of_birth) = data.date_of_birth {
            q = q.bind(date_of_birth);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Display name: first name plus last name when present
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_default_is_donor() {
        assert_eq!(UserRole::default(), UserRole::Donor);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Ngo).unwrap(), "\"ngo\"");
        assert_eq!(serde_json::to_string(&UserRole::Donor).unwrap(), "\"donor\"");
    }

    #[test]
    fn test_role_rejects_unknown_values() {
        let result: Result<UserRole, _> = serde_json::from_str("\"corporate\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_update_user_default_patches_nothing() {
        let update = UpdateUser::default();
        assert!(update.first_name.is_none());
        assert!(update.last_name.is_none());
        assert!(update.date_of_birth.is_none());
        assert!(update.email.is_none());
        assert!(update.password_hash.is_none());
    }

    #[test]
    fn test_display_name() {
        let mut user = User {
            id: Uuid::new_v4(),
            first_name: "Jane".to_string(),
            last_name: Some("Doe".to_string()),
            email: "jane@example.org".to_string(),
            password_hash: "hash".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
            role: UserRole::Donor,
            is_admin: false,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(user.display_name(), "Jane Doe");

        user.last_name = None;
        assert_eq!(user.display_name(), "Jane");
    }

    // Integration tests for database operations are in the api crate's
    // tests/ directory
}
