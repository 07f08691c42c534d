/// Reporting aggregate endpoints
///
/// # Endpoints
///
/// - `GET /analytics/donations` - Monthly totals and distinct-donor counts
/// - `GET /analytics/donors` - Donation counts per donor type
/// - `GET /analytics/top-donors` - The ten largest donors by lifetime total
///
/// All three rescan the full ledger on every call; there is no
/// materialization. Every endpoint requires an authenticated caller.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use givehub_shared::{auth::middleware::AuthContext, models::reports};
use rust_decimal::Decimal;
use serde::Serialize;

/// One month of donation activity
#[derive(Debug, Serialize)]
pub struct MonthlyDonationsEntry {
    /// Bucket label, e.g. "Jan 2024"
    pub month: String,

    /// Sum of donation amounts in the month
    pub donations: Decimal,

    /// Count of distinct donors in the month
    pub donors: i64,
}

/// One donor-type slice
#[derive(Debug, Serialize)]
pub struct DonorTypeEntry {
    /// Donor type label ("ngo", "donor", or "Unknown")
    pub name: String,

    /// Number of donations made by donors of this type
    pub value: i64,
}

/// One entry of the top-donor ranking
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopDonorEntry {
    /// Donor display name
    pub name: String,

    /// Donor email
    pub email: String,

    /// Lifetime donated total
    pub total_donated: Decimal,
}

/// Monthly donations and donors
///
/// Buckets are sorted chronologically ascending.
///
/// # Endpoint
///
/// ```text
/// GET /analytics/donations
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// ```json
/// [
///   { "month": "Jan 2024", "donations": 30, "donors": 1 },
///   { "month": "Feb 2024", "donations": 5, "donors": 1 }
/// ]
/// ```
pub async fn monthly_donations(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<MonthlyDonationsEntry>>> {
    let buckets = reports::monthly_donations(&state.db).await?;

    let entries = buckets
        .into_iter()
        .map(|b| MonthlyDonationsEntry {
            month: b.label(),
            donations: b.total,
            donors: b.donors,
        })
        .collect();

    Ok(Json(entries))
}

/// Donor type distribution
///
/// # Endpoint
///
/// ```text
/// GET /analytics/donors
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// ```json
/// [
///   { "name": "donor", "value": 12 },
///   { "name": "ngo", "value": 3 }
/// ]
/// ```
pub async fn donor_types(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<DonorTypeEntry>>> {
    let counts = reports::donor_type_distribution(&state.db).await?;

    let entries = counts
        .into_iter()
        .map(|c| DonorTypeEntry {
            name: c.label(),
            value: c.count,
        })
        .collect();

    Ok(Json(entries))
}

/// Top donors
///
/// At most ten entries, ordered by lifetime total descending.
///
/// # Endpoint
///
/// ```text
/// GET /analytics/top-donors
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// ```json
/// [
///   { "name": "Ada Lovelace", "email": "ada@example.org", "totalDonated": 100 }
/// ]
/// ```
pub async fn top_donors(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TopDonorEntry>>> {
    let donors = reports::top_donors(&state.db).await?;

    let entries = donors
        .into_iter()
        .map(|d| TopDonorEntry {
            name: d.display_name(),
            email: d.email.clone(),
            total_donated: d.total_donated,
        })
        .collect();

    Ok(Json(entries))
}
