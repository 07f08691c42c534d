/// Database models for GiveHub
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts (identity, hashed secret, role)
/// - `campaign`: Fundraising campaigns with lifecycle status
/// - `donation`: The append-only donation ledger
/// - `reports`: Read-only reporting aggregations over the ledger
///
/// # Example
///
/// ```no_run
/// use givehub_shared::models::user::{CreateUser, User, UserRole};
/// use givehub_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::NaiveDate;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     first_name: "Jane".to_string(),
///     last_name: Some("Doe".to_string()),
///     email: "jane@example.org".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
///     role: UserRole::Ngo,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod campaign;
pub mod donation;
pub mod reports;
pub mod user;
