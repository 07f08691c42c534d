/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use givehub_api::{app::AppState, config::Config};
/// use givehub_shared::storage::HttpImageStore;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let images = Arc::new(HttpImageStore::new(&config.images.upload_url));
/// let state = AppState::new(pool, config, images);
/// let app = givehub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::error::ApiError;
use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use givehub_shared::storage::ImageStore;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// Maximum accepted request body, sized for multipart image uploads
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The pool
/// and image store are created once at startup; handlers share them through
/// this struct and never re-initialize connections.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Image object-store collaborator
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, images: Arc<dyn ImageStore>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            images,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /users/
/// │   ├── POST /register             # Public
/// │   ├── POST /login                # Public
/// │   ├── GET  /profile              # Authenticated
/// │   └── PUT  /update               # Authenticated
/// ├── /campaigns/
/// │   ├── GET    /readall            # Public
/// │   ├── GET    /read/:id           # Public
/// │   ├── GET    /my-campaigns       # Authenticated
/// │   ├── POST   /create             # Authenticated + fundraiser role
/// │   ├── PUT    /update/:id         # Authenticated + owner-or-admin
/// │   └── DELETE /delete/:id         # Authenticated + owner-or-admin
/// ├── /donations/
/// │   ├── POST /create               # Authenticated
/// │   └── GET  /campaign/:id         # Authenticated
/// └── /analytics/
///     ├── GET /donations             # Authenticated
///     ├── GET /donors                # Authenticated
///     └── GET /top-donors            # Authenticated
/// ```
///
/// # Middleware Stack
///
/// 1. Request logging (tower-http TraceLayer)
/// 2. CORS (permissive; the platform serves public dashboards)
/// 3. Bearer-token authentication on the protected route groups
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_public = Router::new()
        .route("/register", post(routes::users::register))
        .route("/login", post(routes::users::login));

    let user_protected = Router::new()
        .route("/profile", get(routes::users::profile))
        .route("/update", put(routes::users::update_profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let campaign_public = Router::new()
        .route("/readall", get(routes::campaigns::read_all))
        .route("/read/:id", get(routes::campaigns::read_one));

    let campaign_protected = Router::new()
        .route("/my-campaigns", get(routes::campaigns::my_campaigns))
        .route("/create", post(routes::campaigns::create))
        .route("/update/:id", put(routes::campaigns::update))
        .route("/delete/:id", delete(routes::campaigns::delete))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let donation_routes = Router::new()
        .route("/create", post(routes::donations::create))
        .route("/campaign/:id", get(routes::donations::list_by_campaign))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let analytics_routes = Router::new()
        .route("/donations", get(routes::analytics::monthly_donations))
        .route("/donors", get(routes::analytics::donor_types))
        .route("/top-donors", get(routes::analytics::top_donors))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(health_routes)
        .nest("/users", user_public.merge(user_protected))
        .nest("/campaigns", campaign_public.merge(campaign_protected))
        .nest("/donations", donation_routes)
        .nest("/analytics", analytics_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the bearer token via the shared middleware and maps its
/// failures onto the API error taxonomy (missing token = 401, failed
/// signature/expiry check = 403).
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    givehub_shared::auth::middleware::jwt_auth_middleware(
        state.jwt_secret().to_string(),
        req,
        next,
    )
    .await
    .map_err(ApiError::from)
}
