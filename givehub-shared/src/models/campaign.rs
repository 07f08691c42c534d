/// Campaign model and database operations
///
/// This module provides the Campaign model representing fundraising
/// projects. A campaign accrues a raised total that is only ever mutated by
/// the donation-recording transaction in
/// [`crate::models::donation::Donation::record`], never by campaign update.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE campaign_category AS ENUM ('health', 'education', 'disaster', 'others');
/// CREATE TYPE campaign_status AS ENUM ('active', 'closed');
///
/// CREATE TABLE campaigns (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     category campaign_category NOT NULL DEFAULT 'others',
///     goal_amount NUMERIC(14, 2) NOT NULL CHECK (goal_amount > 0),
///     raised_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
///     created_by UUID NOT NULL REFERENCES users(id),
///     status campaign_status NOT NULL DEFAULT 'active',
///     start_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     end_date TIMESTAMPTZ,
///     images TEXT[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Campaign category
///
/// Unknown values are rejected at the boundary, never coerced to the
/// default; an omitted category defaults to `Others`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "campaign_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignCategory {
    Health,
    Education,
    Disaster,
    Others,
}

impl CampaignCategory {
    /// Category name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignCategory::Health => "health",
            CampaignCategory::Education => "education",
            CampaignCategory::Disaster => "disaster",
            CampaignCategory::Others => "others",
        }
    }

    /// Parses a category from its wire representation
    ///
    /// Returns None for unrecognized values so callers can reject them.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "health" => Some(CampaignCategory::Health),
            "education" => Some(CampaignCategory::Education),
            "disaster" => Some(CampaignCategory::Disaster),
            "others" => Some(CampaignCategory::Others),
            _ => None,
        }
    }
}

impl Default for CampaignCategory {
    fn default() -> Self {
        CampaignCategory::Others
    }
}

/// Campaign lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    /// Accepting donations
    Active,

    /// No longer accepting donations
    Closed,
}

impl Default for CampaignStatus {
    fn default() -> Self {
        CampaignStatus::Active
    }
}

/// Campaign model representing a fundraising project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Campaign {
    /// Unique campaign ID
    pub id: Uuid,

    /// Campaign title
    pub title: String,

    /// Campaign description
    pub description: String,

    /// Category
    pub category: CampaignCategory,

    /// Target amount
    pub goal_amount: Decimal,

    /// Donations collected so far
    ///
    /// Monotonically non-decreasing; written only by the donation
    /// transaction.
    pub raised_amount: Decimal,

    /// User who created the campaign
    pub created_by: Uuid,

    /// Lifecycle status
    pub status: CampaignStatus,

    /// When the campaign opens
    pub start_date: DateTime<Utc>,

    /// When the campaign ends (None = open-ended)
    pub end_date: Option<DateTime<Utc>>,

    /// Hosted image URLs
    pub images: Vec<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Campaign row joined with its creator's public identity
///
/// Used by the public read endpoints, which display who runs each campaign.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CampaignWithCreator {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub goal_amount: Decimal,
    pub raised_amount: Decimal,
    pub created_by: Uuid,
    pub status: CampaignStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,

    /// Creator's first name
    pub creator_first_name: String,

    /// Creator's last name
    pub creator_last_name: Option<String>,

    /// Creator's email
    pub creator_email: String,
}

/// Input for creating a new campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaign {
    /// Campaign title (non-empty)
    pub title: String,

    /// Campaign description (non-empty)
    pub description: String,

    /// Category (defaults to Others when omitted at the boundary)
    pub category: CampaignCategory,

    /// Target amount (positive)
    pub goal_amount: Decimal,

    /// Creating user
    pub created_by: Uuid,

    /// Opening date (None = now)
    pub start_date: Option<DateTime<Utc>>,

    /// Closing date
    pub end_date: Option<DateTime<Utc>>,

    /// Hosted image URLs, already uploaded by the caller
    pub images: Vec<String>,
}

/// Input for updating an existing campaign
///
/// Explicit optional-field patch: every updatable field is listed, each
/// independently None-to-mean-"unchanged". The raised amount is deliberately
/// absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCampaign {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New goal amount
    pub goal_amount: Option<Decimal>,

    /// New category
    pub category: Option<CampaignCategory>,

    /// New status
    pub status: Option<CampaignStatus>,

    /// New start date
    pub start_date: Option<DateTime<Utc>>,

    /// New end date
    pub end_date: Option<DateTime<Utc>>,
}

impl UpdateCampaign {
    /// Whether this patch changes anything
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.goal_amount.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

const CAMPAIGN_COLUMNS: &str = "id, title, description, category, goal_amount, raised_amount, \
                                created_by, status, start_date, end_date, images, created_at";

const CAMPAIGN_WITH_CREATOR_COLUMNS: &str =
    "c.id, c.title, c.description, c.category, c.goal_amount, c.raised_amount, \
     c.created_by, c.status, c.start_date, c.end_date, c.images, c.created_at, \
     u.first_name AS creator_first_name, u.last_name AS creator_last_name, \
     u.email AS creator_email";

impl Campaign {
    /// Creates a new campaign
    ///
    /// # Errors
    ///
    /// Returns an error if the creator does not exist (foreign key) or the
    /// database connection fails
    pub async fn create(pool: &PgPool, data: CreateCampaign) -> Result<Self, sqlx::Error> {
        let campaign = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            INSERT INTO campaigns (title, description, category, goal_amount, created_by,
                                   start_date, end_date, images)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7, $8)
            RETURNING {CAMPAIGN_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.category)
        .bind(data.goal_amount)
        .bind(data.created_by)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.images)
        .fetch_one(pool)
        .await?;

        Ok(campaign)
    }

    /// Finds a campaign by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let campaign = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(campaign)
    }

    /// Finds a campaign by ID with the creator's identity joined
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_id_with_creator(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<CampaignWithCreator>, sqlx::Error> {
        let campaign = sqlx::query_as::<_, CampaignWithCreator>(&format!(
            r#"
            SELECT {CAMPAIGN_WITH_CREATOR_COLUMNS}
            FROM campaigns c
            JOIN users u ON u.id = c.created_by
            WHERE c.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(campaign)
    }

    /// Lists all campaigns with creator identities, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CampaignWithCreator>, sqlx::Error> {
        let campaigns = sqlx::query_as::<_, CampaignWithCreator>(&format!(
            r#"
            SELECT {CAMPAIGN_WITH_CREATOR_COLUMNS}
            FROM campaigns c
            JOIN users u ON u.id = c.created_by
            ORDER BY c.created_at DESC
            "#
        ))
        .fetch_all(pool)
        .await?;

        Ok(campaigns)
    }

    /// Lists campaigns created by one user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn list_by_creator(
        pool: &PgPool,
        created_by: Uuid,
    ) -> Result<Vec<CampaignWithCreator>, sqlx::Error> {
        let campaigns = sqlx::query_as::<_, CampaignWithCreator>(&format!(
            r#"
            SELECT {CAMPAIGN_WITH_CREATOR_COLUMNS}
            FROM campaigns c
            JOIN users u ON u.id = c.created_by
            WHERE c.created_by = $1
            ORDER BY c.created_at DESC
            "#
        ))
        .bind(created_by)
        .fetch_all(pool)
        .await?;

        Ok(campaigns)
    }

    /// Applies a partial update to an existing campaign
    ///
    /// Only non-None fields in `data` are written. The raised amount cannot
    /// be touched through this path.
    ///
    /// # Returns
    ///
    /// The updated campaign if found, None if the campaign doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCampaign,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        // Build the UPDATE dynamically from the fields that are present
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            sets.push(format!("title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            sets.push(format!("description = ${}", bind_count));
        }
        if data.goal_amount.is_some() {
            bind_count += 1;
            sets.push(format!("goal_amount = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            sets.push(format!("category = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            sets.push(format!("status = ${}", bind_count));
        }
        if data.start_date.is_some() {
            bind_count += 1;
            sets.push(format!("start_date = ${}", bind_count));
        }
        if data.end_date.is_some() {
            bind_count += 1;
            sets.push(format!("end_date = ${}", bind_count));
        }

        let query = format!(
            "UPDATE campaigns SET {} WHERE id = $1 RETURNING {CAMPAIGN_COLUMNS}",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Campaign>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(goal_amount) = data.goal_amount {
            q = q.bind(goal_amount);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(start_date) = data.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = data.end_date {
            q = q.bind(end_date);
        }

        let campaign = q.fetch_optional(pool).await?;

        Ok(campaign)
    }

    /// Hard-deletes a campaign
    ///
    /// Associated donations are intentionally left in place; the ledger is
    /// append-only and tolerates orphaned campaign references.
    ///
    /// # Returns
    ///
    /// True if a campaign was deleted, false if it didn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_default_is_others() {
        assert_eq!(CampaignCategory::default(), CampaignCategory::Others);
    }

    #[test]
    fn test_category_parse_known_values() {
        assert_eq!(CampaignCategory::parse("health"), Some(CampaignCategory::Health));
        assert_eq!(CampaignCategory::parse("education"), Some(CampaignCategory::Education));
        assert_eq!(CampaignCategory::parse("disaster"), Some(CampaignCategory::Disaster));
        assert_eq!(CampaignCategory::parse("others"), Some(CampaignCategory::Others));
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        assert_eq!(CampaignCategory::parse("wildlife"), None);
        assert_eq!(CampaignCategory::parse(""), None);
        // Not coerced to the default, and not case-folded
        assert_eq!(CampaignCategory::parse("Health"), None);
    }

    #[test]
    fn test_category_serde_rejects_unknown() {
        let result: Result<CampaignCategory, _> = serde_json::from_str("\"wildlife\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_status_default_is_active() {
        assert_eq!(CampaignStatus::default(), CampaignStatus::Active);
    }

    #[test]
    fn test_update_campaign_default_is_empty() {
        let update = UpdateCampaign::default();
        assert!(update.is_empty());

        let update = UpdateCampaign {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
