/// Donation ledger model and database operations
///
/// This module provides the Donation model: the append-only ledger of
/// contributions. A donation is immutable once created; no update or delete
/// operation exists.
///
/// Recording a donation and incrementing the owning campaign's raised total
/// happen in one database transaction, so the ledger and the campaign total
/// cannot diverge.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE donations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     campaign_id UUID NOT NULL,
///     donor_id UUID NOT NULL REFERENCES users(id),
///     amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
///     donated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// One immutable contribution event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donation {
    /// Unique donation ID
    pub id: Uuid,

    /// Campaign the donation belongs to
    pub campaign_id: Uuid,

    /// Contributing user
    pub donor_id: Uuid,

    /// Donated amount (positive)
    pub amount: Decimal,

    /// When the donation was made
    pub donated_at: DateTime<Utc>,
}

/// Donation row joined with donor and campaign identity for display
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DonationWithContext {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub donor_id: Uuid,
    pub amount: Decimal,
    pub donated_at: DateTime<Utc>,

    /// Donor's first name
    pub donor_first_name: String,

    /// Donor's last name
    pub donor_last_name: Option<String>,

    /// Donor's email
    pub donor_email: String,

    /// Title of the campaign donated to
    pub campaign_title: String,
}

/// Input for recording a donation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDonation {
    /// Campaign being donated to
    pub campaign_id: Uuid,

    /// Contributing user (from the verified token, never the request body)
    pub donor_id: Uuid,

    /// Donated amount (must be positive; validated by the caller)
    pub amount: Decimal,
}

impl Donation {
    /// Records a donation and increments the campaign's raised total
    ///
    /// Both writes run in a single transaction: the increment doubles as the
    /// campaign-existence check, and if it matches no row the transaction is
    /// rolled back without inserting a ledger entry.
    ///
    /// # Returns
    ///
    /// The new donation, or None if the campaign doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or the transaction
    /// cannot commit
    pub async fn record(pool: &PgPool, data: RecordDonation) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE campaigns
            SET raised_amount = raised_amount + $1
            WHERE id = $2
            RETURNING id
            "#,
        )
        .bind(data.amount)
        .bind(data.campaign_id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let donation = sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO donations (campaign_id, donor_id, amount)
            VALUES ($1, $2, $3)
            RETURNING id, campaign_id, donor_id, amount, donated_at
            "#,
        )
        .bind(data.campaign_id)
        .bind(data.donor_id)
        .bind(data.amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            donation_id = %donation.id,
            campaign_id = %donation.campaign_id,
            "Donation recorded"
        );

        Ok(Some(donation))
    }

    /// Lists donations for one campaign with donor and campaign identity
    /// joined, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: Uuid,
    ) -> Result<Vec<DonationWithContext>, sqlx::Error> {
        let donations = sqlx::query_as::<_, DonationWithContext>(
            r#"
            SELECT d.id, d.campaign_id, d.donor_id, d.amount, d.donated_at,
                   u.first_name AS donor_first_name,
                   u.last_name AS donor_last_name,
                   u.email AS donor_email,
                   c.title AS campaign_title
            FROM donations d
            JOIN users u ON u.id = d.donor_id
            JOIN campaigns c ON c.id = d.campaign_id
            WHERE d.campaign_id = $1
            ORDER BY d.donated_at DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(pool)
        .await?;

        Ok(donations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_donation_struct() {
        let record = RecordDonation {
            campaign_id: Uuid::new_v4(),
            donor_id: Uuid::new_v4(),
            amount: dec!(25.50),
        };

        assert_eq!(record.amount, dec!(25.50));
    }

    // The transactional record path and the ledger/total invariant are
    // covered by the api crate's integration tests
}
