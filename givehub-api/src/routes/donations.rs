/// Donation endpoints
///
/// # Endpoints
///
/// - `POST /donations/create` - Record a donation (authenticated)
/// - `GET /donations/campaign/:id` - List a campaign's donations (authenticated)
///
/// Recording inserts the ledger entry and increments the campaign's raised
/// total in one transaction; the two can never diverge. The donor identity
/// always comes from the verified token, never from the request body.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use givehub_shared::{
    auth::middleware::AuthContext,
    models::donation::{Donation, DonationWithContext, RecordDonation},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create donation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    /// Campaign being donated to
    pub campaign_id: Option<Uuid>,

    /// Donated amount
    pub amount: Option<Decimal>,
}

/// Donation representation on the wire
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationData {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub donor_id: Uuid,
    pub amount: Decimal,
    pub donated_at: DateTime<Utc>,
}

impl From<Donation> for DonationData {
    fn from(d: Donation) -> Self {
        Self {
            id: d.id,
            campaign_id: d.campaign_id,
            donor_id: d.donor_id,
            amount: d.amount,
            donated_at: d.donated_at,
        }
    }
}

/// Create donation response
#[derive(Debug, Serialize)]
pub struct CreateDonationResponse {
    /// The recorded donation
    pub donation: DonationData,
}

/// Donor identity embedded in the listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorData {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
}

/// Campaign identity embedded in the listing
#[derive(Debug, Serialize)]
pub struct DonationCampaignData {
    pub id: Uuid,
    pub title: String,
}

/// Donation listing entry with donor and campaign resolved for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationListItem {
    pub id: Uuid,
    pub amount: Decimal,
    pub donated_at: DateTime<Utc>,
    pub donor: DonorData,
    pub campaign: DonationCampaignData,
}

impl From<DonationWithContext> for DonationListItem {
    fn from(d: DonationWithContext) -> Self {
        Self {
            id: d.id,
            amount: d.amount,
            donated_at: d.donated_at,
            donor: DonorData {
                id: d.donor_id,
                first_name: d.donor_first_name,
                last_name: d.donor_last_name,
                email: d.donor_email,
            },
            campaign: DonationCampaignData {
                id: d.campaign_id,
                title: d.campaign_title,
            },
        }
    }
}

/// Record a donation
///
/// # Endpoint
///
/// ```text
/// POST /donations/create
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "campaignId": "uuid", "amount": 25.5 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing campaign id or missing/non-positive amount
/// - `401/403`: missing or invalid token
/// - `404 Not Found`: the campaign does not exist
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateDonationRequest>,
) -> ApiResult<(StatusCode, Json<CreateDonationResponse>)> {
    let campaign_id = req
        .campaign_id
        .ok_or_else(|| ApiError::BadRequest("Campaign and amount required".to_string()))?;
    let amount = req
        .amount
        .ok_or_else(|| ApiError::BadRequest("Campaign and amount required".to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(ApiError::BadRequest("Amount must be positive".to_string()));
    }

    let donation = Donation::record(
        &state.db,
        RecordDonation {
            campaign_id,
            donor_id: auth.user_id,
            amount,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    tracing::info!(
        donation_id = %donation.id,
        campaign_id = %campaign_id,
        donor_id = %auth.user_id,
        "Donation recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateDonationResponse {
            donation: donation.into(),
        }),
    ))
}

/// List a campaign's donations
///
/// Open to any authenticated caller; campaigns display their donation
/// history publicly once logged in.
///
/// # Endpoint
///
/// ```text
/// GET /donations/campaign/:id
/// Authorization: Bearer <token>
/// ```
pub async fn list_by_campaign(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<DonationListItem>>> {
    let donations = Donation::list_by_campaign(&state.db, id).await?;

    Ok(Json(donations.into_iter().map(Into::into).collect()))
}
