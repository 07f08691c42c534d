/// Campaign CRUD endpoints
///
/// # Endpoints
///
/// - `GET /campaigns/readall` - List all campaigns (public)
/// - `GET /campaigns/read/:id` - Read one campaign (public)
/// - `GET /campaigns/my-campaigns` - List the caller's campaigns (authenticated)
/// - `POST /campaigns/create` - Create a campaign (authenticated, fundraiser role, multipart)
/// - `PUT /campaigns/update/:id` - Patch a campaign (authenticated, owner-or-admin)
/// - `DELETE /campaigns/delete/:id` - Delete a campaign (authenticated, owner-or-admin)
///
/// # Image uploads
///
/// Campaign creation accepts a multipart body whose `images` parts carry the
/// raw files. Each file is handed to the image object store one at a time;
/// the policy is all-or-nothing: the first failed upload aborts the whole
/// creation and nothing is persisted.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use givehub_shared::{
    auth::middleware::AuthContext,
    models::campaign::{
        Campaign, CampaignCategory, CampaignStatus, CampaignWithCreator, CreateCampaign,
        UpdateCampaign,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Campaign representation returned by the mutation endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignData {
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
}

impl From<Campaign> for CampaignData {
    fn from(c: Campaign) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            category: c.category,
            goal_amount: c.goal_amount,
            raised_amount: c.raised_amount,
            created_by: c.created_by,
            status: c.status,
            start_date: c.start_date,
            end_date: c.end_date,
            images: c.images,
            created_at: c.created_at,
        }
    }
}

/// Creator identity embedded in the public read endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorData {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
}

/// Campaign representation returned by the read endpoints, with the creator
/// resolved for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignListItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub goal_amount: Decimal,
    pub raised_amount: Decimal,
    pub created_by: CreatorData,
    pub status: CampaignStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CampaignWithCreator> for CampaignListItem {
    fn from(c: CampaignWithCreator) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            category: c.category,
            goal_amount: c.goal_amount,
            raised_amount: c.raised_amount,
            created_by: CreatorData {
                id: c.created_by,
                first_name: c.creator_first_name,
                last_name: c.creator_last_name,
                email: c.creator_email,
            },
            status: c.status,
            start_date: c.start_date,
            end_date: c.end_date,
            images: c.images,
            created_at: c.created_at,
        }
    }
}

/// Create campaign response
#[derive(Debug, Serialize)]
pub struct CreateCampaignResponse {
    /// The newly created campaign
    pub campaign: CampaignData,
}

/// Update campaign request
///
/// Explicit optional-field patch; category and status arrive as strings so
/// unknown values are rejected with 400 rather than a body-parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New goal amount
    pub goal_amount: Option<Decimal>,

    /// New category (health, education, disaster, others)
    pub category: Option<String>,

    /// New status (active, closed)
    pub status: Option<String>,

    /// New start date
    pub start_date: Option<DateTime<Utc>>,

    /// New end date
    pub end_date: Option<DateTime<Utc>>,
}

/// Update campaign response
#[derive(Debug, Serialize)]
pub struct UpdateCampaignResponse {
    /// The updated campaign
    pub campaign: CampaignData,
}

/// Delete campaign response
#[derive(Debug, Serialize)]
pub struct DeleteCampaignResponse {
    /// Whether the campaign was deleted
    pub deleted: bool,
}

/// Fields collected from the multipart creation body
#[derive(Debug, Default)]
struct CreateCampaignForm {
    title: Option<String>,
    description: Option<String>,
    goal_amount: Option<String>,
    category: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    files: Vec<(String, Vec<u8>)>,
}

impl CreateCampaignForm {
    /// Drains an axum multipart body into the form
    async fn read(multipart: &mut Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "title" => form.title = Some(read_text(field).await?),
                "description" => form.description = Some(read_text(field).await?),
                "goalAmount" => form.goal_amount = Some(read_text(field).await?),
                "category" => form.category = Some(read_text(field).await?),
                "startDate" => form.start_date = Some(read_text(field).await?),
                "endDate" => form.end_date = Some(read_text(field).await?),
                "images" => {
                    let filename = field
                        .file_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("image-{}", form.files.len()));
                    let bytes = field.bytes().await.map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read image part: {}", e))
                    })?;
                    form.files.push((filename, bytes.to_vec()));
                }
                // Unknown parts are ignored, matching JSON-body behavior
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart field: {}", e)))
}

fn parse_category(value: &str) -> ApiResult<CampaignCategory> {
    CampaignCategory::parse(value)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown category: {}", value)))
}

fn parse_status(value: &str) -> ApiResult<CampaignStatus> {
    match value {
        "active" => Ok(CampaignStatus::Active),
        "closed" => Ok(CampaignStatus::Closed),
        _ => Err(ApiError::BadRequest(format!("Unknown status: {}", value))),
    }
}

fn parse_date(value: &str, field: &str) -> ApiResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} (expected RFC 3339)", field)))
}

/// List all campaigns (public)
///
/// # Endpoint
///
/// ```text
/// GET /campaigns/readall
/// ```
pub async fn read_all(State(state): State<AppState>) -> ApiResult<Json<Vec<CampaignListItem>>> {
    let campaigns = Campaign::list_all(&state.db).await?;

    Ok(Json(campaigns.into_iter().map(Into::into).collect()))
}

/// Read one campaign by id (public)
///
/// # Endpoint
///
/// ```text
/// GET /campaigns/read/:id
/// ```
///
/// # Errors
///
/// - `404 Not Found`: no campaign with this id
pub async fn read_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CampaignListItem>> {
    let campaign = Campaign::find_by_id_with_creator(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    Ok(Json(campaign.into()))
}

/// List the caller's campaigns
///
/// # Endpoint
///
/// ```text
/// GET /campaigns/my-campaigns
/// Authorization: Bearer <token>
/// ```
pub async fn my_campaigns(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<CampaignListItem>>> {
    let campaigns = Campaign::list_by_creator(&state.db, auth.user_id).await?;

    Ok(Json(campaigns.into_iter().map(Into::into).collect()))
}

/// Create a campaign
///
/// Requires the fundraiser role. Accepts a multipart body with text fields
/// (`title`, `description`, `goalAmount`, optional `category`, `startDate`,
/// `endDate`) and any number of `images` file parts. Images are uploaded to
/// the object store one at a time before the campaign row is written; a
/// single failed upload aborts the whole operation.
///
/// # Endpoint
///
/// ```text
/// POST /campaigns/create
/// Authorization: Bearer <token>
/// Content-Type: multipart/form-data
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing title/description/goalAmount, non-positive
///   goal, or unknown category
/// - `401/403`: missing token / not a fundraiser
/// - `500 Internal Server Error`: an image upload or database write failed
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<CreateCampaignResponse>)> {
    // Role check before touching the body; nothing is persisted on failure
    if !auth.is_fundraiser() {
        return Err(ApiError::Forbidden(
            "Only NGO accounts can create campaigns".to_string(),
        ));
    }

    let form = CreateCampaignForm::read(&mut multipart).await?;

    let title = form
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?;
    let description = form
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Description is required".to_string()))?;

    let goal_amount = form
        .goal_amount
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Goal amount is required".to_string()))
        .and_then(|raw| {
            Decimal::from_str(raw)
                .map_err(|_| ApiError::BadRequest("Goal amount must be a number".to_string()))
        })?;
    if goal_amount <= Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "Goal amount must be positive".to_string(),
        ));
    }

    // Omitted category defaults; unknown values are rejected, never coerced
    let category = match form.category.as_deref() {
        Some(raw) => parse_category(raw)?,
        None => CampaignCategory::default(),
    };

    let start_date = form
        .start_date
        .as_deref()
        .map(|raw| parse_date(raw, "startDate"))
        .transpose()?;
    let end_date = form
        .end_date
        .as_deref()
        .map(|raw| parse_date(raw, "endDate"))
        .transpose()?;

    // All-or-nothing: the first failure aborts before anything is persisted
    let mut images = Vec::with_capacity(form.files.len());
    for (filename, bytes) in form.files {
        let url = state.images.upload(&filename, bytes).await?;
        images.push(url);
    }

    let campaign = Campaign::create(
        &state.db,
        CreateCampaign {
            title,
            description,
            category,
            goal_amount,
            created_by: auth.user_id,
            start_date,
            end_date,
            images,
        },
    )
    .await?;

    tracing::info!(campaign_id = %campaign.id, created_by = %auth.user_id, "Campaign created");

    Ok((
        StatusCode::CREATED,
        Json(CreateCampaignResponse {
            campaign: campaign.into(),
        }),
    ))
}

/// Patch a campaign
///
/// Permitted only for the creator or an admin. Only fields present in the
/// request mutate the stored record; the raised amount is never updatable.
///
/// # Endpoint
///
/// ```text
/// PUT /campaigns/update/:id
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "title": "New title", "status": "closed" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: unknown category/status or non-positive goal
/// - `403 Forbidden`: caller is neither the creator nor an admin
/// - `404 Not Found`: no campaign with this id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCampaignRequest>,
) -> ApiResult<Json<UpdateCampaignResponse>> {
    let campaign = Campaign::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    if !auth.can_modify(campaign.created_by) {
        return Err(ApiError::Forbidden(
            "Not authorized to update this campaign".to_string(),
        ));
    }

    if let Some(goal) = req.goal_amount {
        if goal <= Decimal::ZERO {
            return Err(ApiError::BadRequest(
                "Goal amount must be positive".to_string(),
            ));
        }
    }

    let category = req.category.as_deref().map(parse_category).transpose()?;
    let status = req.status.as_deref().map(parse_status).transpose()?;

    let patch = UpdateCampaign {
        title: req.title,
        description: req.description,
        goal_amount: req.goal_amount,
        category,
        status,
        start_date: req.start_date,
        end_date: req.end_date,
    };

    let updated = Campaign::update(&state.db, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    Ok(Json(UpdateCampaignResponse {
        campaign: updated.into(),
    }))
}

/// Delete a campaign
///
/// Permitted only for the creator or an admin. This is a hard delete of the
/// single record; associated donations stay in the ledger.
///
/// # Endpoint
///
/// ```text
/// DELETE /campaigns/delete/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: caller is neither the creator nor an admin
/// - `404 Not Found`: no campaign with this id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteCampaignResponse>> {
    let campaign = Campaign::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    if !auth.can_modify(campaign.created_by) {
        return Err(ApiError::Forbidden(
            "Not authorized to delete this campaign".to_string(),
        ));
    }

    let deleted = Campaign::delete(&state.db, id).await?;

    tracing::info!(campaign_id = %id, deleted_by = %auth.user_id, "Campaign deleted");

    Ok(Json(DeleteCampaignResponse { deleted }))
}
