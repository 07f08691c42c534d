/// Reporting aggregations over the donation ledger
///
/// Three read-only aggregate views, each a single SQL aggregation that
/// rescans the full ledger on every call. There is no incremental
/// materialization; the domain has no latency SLA and the rescan is the
/// documented scaling limit.
///
/// # Views
///
/// - [`MonthlyDonations`]: totals and distinct-donor counts per calendar
///   month, chronologically ascending
/// - [`DonorTypeCount`]: donation counts grouped by donor role
/// - [`TopDonor`]: the ten largest donors by lifetime total, descending

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// How many donors the top-donor ranking returns
pub const TOP_DONORS_LIMIT: i64 = 10;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Formats a (month, year) bucket as `"<3-letter month> <4-digit year>"`
///
/// # Example
///
/// ```
/// use givehub_shared::models::reports::month_label;
///
/// assert_eq!(month_label(1, 2024), "Jan 2024");
/// assert_eq!(month_label(12, 2023), "Dec 2023");
/// ```
pub fn month_label(month: i32, year: i32) -> String {
    let name = MONTH_NAMES
        .get((month - 1).max(0) as usize)
        .copied()
        .unwrap_or("???");
    format!("{} {}", name, year)
}

/// One calendar-month bucket of the ledger
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonthlyDonations {
    /// Calendar month (1-12)
    pub month: i32,

    /// Calendar year
    pub year: i32,

    /// Sum of donation amounts in the bucket
    pub total: Decimal,

    /// Count of distinct donors in the bucket
    pub donors: i64,
}

impl MonthlyDonations {
    /// Display label for the bucket, e.g. `"Jan 2024"`
    pub fn label(&self) -> String {
        month_label(self.month, self.year)
    }
}

/// Donation count for one donor role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DonorTypeCount {
    /// Donor role name; None when the donor row is missing
    pub donor_type: Option<String>,

    /// Number of donations made by donors of this role
    pub count: i64,
}

impl DonorTypeCount {
    /// Display label; a missing role is reported as "Unknown"
    pub fn label(&self) -> String {
        self.donor_type
            .clone()
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// One entry of the top-donor ranking
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopDonor {
    /// Donor's first name
    pub first_name: String,

    /// Donor's last name
    pub last_name: Option<String>,

    /// Donor's email
    pub email: String,

    /// Lifetime donated total
    pub total_donated: Decimal,
}

impl TopDonor {
    /// Display name: first name plus last name when present
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// Monthly donation totals and distinct-donor counts
///
/// Buckets are ordered chronologically ascending.
///
/// # Errors
///
/// Returns an error if the database connection fails
pub async fn monthly_donations(pool: &PgPool) -> Result<Vec<MonthlyDonations>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MonthlyDonations>(
        r#"
        SELECT EXTRACT(MONTH FROM donated_at)::INT4 AS month,
               EXTRACT(YEAR FROM donated_at)::INT4 AS year,
               SUM(amount) AS total,
               COUNT(DISTINCT donor_id) AS donors
        FROM donations
        GROUP BY 1, 2
        ORDER BY year ASC, month ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Donation counts grouped by donor role
///
/// Donations whose donor row cannot be joined are grouped under a NULL role
/// (labeled "Unknown" for display).
///
/// # Errors
///
/// Returns an error if the database connection fails
pub async fn donor_type_distribution(pool: &PgPool) -> Result<Vec<DonorTypeCount>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DonorTypeCount>(
        r#"
        SELECT u.role::TEXT AS donor_type,
               COUNT(*) AS count
        FROM donations d
        LEFT JOIN users u ON u.id = d.donor_id
        GROUP BY u.role
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// The ten largest donors by lifetime total, descending
///
/// # Errors
///
/// Returns an error if the database connection fails
pub async fn top_donors(pool: &PgPool) -> Result<Vec<TopDonor>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TopDonor>(
        r#"
        SELECT u.first_name,
               u.last_name,
               u.email,
               SUM(d.amount) AS total_donated
        FROM donations d
        JOIN users u ON u.id = d.donor_id
        GROUP BY u.id, u.first_name, u.last_name, u.email
        ORDER BY total_donated DESC
        LIMIT $1
        "#,
    )
    .bind(TOP_DONORS_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_month_label_format() {
        assert_eq!(month_label(1, 2024), "Jan 2024");
        assert_eq!(month_label(2, 2024), "Feb 2024");
        assert_eq!(month_label(12, 1999), "Dec 1999");
    }

    #[test]
    fn test_month_label_out_of_range() {
        // Should never happen with EXTRACT(MONTH ...), but must not panic
        assert_eq!(month_label(0, 2024), "Jan 2024");
        assert_eq!(month_label(13, 2024), "??? 2024");
    }

    #[test]
    fn test_monthly_bucket_label() {
        let bucket = MonthlyDonations {
            month: 1,
            year: 2024,
            total: dec!(30),
            donors: 1,
        };
        assert_eq!(bucket.label(), "Jan 2024");
    }

    #[test]
    fn test_donor_type_unknown_label() {
        let known = DonorTypeCount {
            donor_type: Some("donor".to_string()),
            count: 4,
        };
        assert_eq!(known.label(), "donor");

        let unknown = DonorTypeCount {
            donor_type: None,
            count: 2,
        };
        assert_eq!(unknown.label(), "Unknown");
    }

    #[test]
    fn test_top_donor_display_name() {
        let donor = TopDonor {
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            email: "ada@example.org".to_string(),
            total_donated: dec!(100),
        };
        assert_eq!(donor.display_name(), "Ada Lovelace");

        let mononym = TopDonor {
            first_name: "Ada".to_string(),
            last_name: None,
            email: "ada@example.org".to_string(),
            total_donated: dec!(100),
        };
        assert_eq!(mononym.display_name(), "Ada");
    }
}
