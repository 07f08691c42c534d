/// User authentication and profile endpoints
///
/// # Endpoints
///
/// - `POST /users/register` - Register a new user
/// - `POST /users/login` - Login and get a token
/// - `GET /users/profile` - Read the caller's profile (authenticated)
/// - `PUT /users/update` - Patch the caller's profile (authenticated)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, NaiveDate, Utc};
use givehub_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, UpdateUser, User, UserRole},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
///
/// Every field is required; presence is checked explicitly so missing fields
/// report as 400 rather than a body-parse failure.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// First name
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: Option<String>,

    /// Last name
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: Option<String>,

    /// Date of birth (YYYY-MM-DD)
    pub dob: Option<NaiveDate>,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    /// Role for the new account (ngo or donor)
    pub role: Option<UserRole>,
}

/// Public view of a user, with every secret field excluded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// User ID
    pub id: Uuid,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: Option<String>,

    /// Email address
    pub email: String,

    /// Date of birth
    pub dob: NaiveDate,

    /// Role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            dob: user.date_of_birth,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Register / login response: a bearer token plus the user's public record
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed bearer token (1-day expiry)
    pub token: String,

    /// The user's public record
    pub data: UserData,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: Option<String>,

    /// Password
    pub password: Option<String>,
}

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// The caller's public record
    pub user: UserData,
}

/// Profile update request
///
/// Explicit optional-field patch; omitted fields keep their prior values. A
/// supplied password is re-hashed before storage.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New first name
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: Option<String>,

    /// New last name
    pub last_name: Option<String>,

    /// New date of birth
    pub dob: Option<NaiveDate>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// Register a new user
///
/// Hashes the password, stores the account, and issues a signed token so the
/// caller is logged in immediately.
///
/// # Endpoint
///
/// ```text
/// POST /users/register
/// Content-Type: application/json
///
/// {
///   "firstName": "Jane",
///   "lastName": "Doe",
///   "dob": "1990-04-02",
///   "email": "jane@example.org",
///   "password": "hunter2hunter2",
///   "role": "ngo"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing or invalid fields
/// - `409 Conflict`: email already exists
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    // Presence first, then format
    let (first_name, last_name, dob, email, password_plain, role) = match (
        &req.first_name,
        &req.last_name,
        req.dob,
        &req.email,
        &req.password,
        req.role,
    ) {
        (Some(f), Some(l), Some(d), Some(e), Some(p), Some(r)) => {
            (f.clone(), l.clone(), d, e.clone(), p.clone(), r)
        }
        _ => {
            return Err(ApiError::BadRequest("All fields are required".to_string()));
        }
    };

    req.validate().map_err(ApiError::from)?;

    let password_hash = password::hash_password(&password_plain)?;

    // The unique constraint on email converts to Conflict in the From impl
    let user = User::create(
        &state.db,
        CreateUser {
            first_name,
            last_name: Some(last_name),
            email,
            password_hash,
            date_of_birth: dob,
            role,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.id, &user.email, user.role, user.is_admin);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            data: user.into(),
        }),
    ))
}

/// Login
///
/// An unknown email and a wrong password produce the same Unauthorized
/// response, so callers cannot probe which addresses are registered.
///
/// # Endpoint
///
/// ```text
/// POST /users/login
/// Content-Type: application/json
///
/// {
///   "email": "jane@example.org",
///   "password": "hunter2hunter2"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing fields
/// - `401 Unauthorized`: invalid credentials
/// - `500 Internal Server Error`: server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (email, password_plain) = match (&req.email, &req.password) {
        (Some(e), Some(p)) => (e.clone(), p.clone()),
        _ => return Err(ApiError::BadRequest("All fields are required".to_string())),
    };

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&password_plain, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, &user.email, user.role, user.is_admin);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse {
        token,
        data: user.into(),
    }))
}

/// Read the caller's profile
///
/// # Endpoint
///
/// ```text
/// GET /users/profile
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `401/403`: missing or invalid token
/// - `404 Not Found`: the token's user no longer resolves
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse { user: user.into() }))
}

/// Patch the caller's profile
///
/// Only fields present in the request mutate the stored record. A supplied
/// password is re-hashed before storage.
///
/// # Endpoint
///
/// ```text
/// PUT /users/update
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "lastName": "Smith" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: invalid field values
/// - `401/403`: missing or invalid token
/// - `404 Not Found`: the token's user no longer resolves
/// - `409 Conflict`: new email already belongs to another account
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    req.validate().map_err(ApiError::from)?;

    let password_hash = match &req.password {
        Some(plain) => Some(password::hash_password(plain)?),
        None => None,
    };

    let patch = UpdateUser {
        first_name: req.first_name,
        last_name: req.last_name,
        date_of_birth: req.dob,
        email: req.email,
        password_hash,
    };

    let user = User::update(&state.db, auth.user_id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse { user: user.into() }))
}
