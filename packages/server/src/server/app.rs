//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post, put},
    Router,
};
use openai_client::OpenAIClient;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::domains::auth::{AdminPassword, JwtService};
use crate::domains::directory::{PgExposureStore, RankingConfig};
use crate::kernel::{HttpPageFetcher, OpenAIService, ServerDeps, ViewCountBuffer};
use crate::server::middleware::{jwt_auth_middleware, require_admin};
use crate::server::routes::{
    create_entry_handler, get_directory_entry_handler, get_news_handler, health_handler,
    ingest_news_handler, list_categories_handler, list_directory_handler, list_news_handler,
    login_handler, publish_news_handler, reset_counters_handler, set_tier_handler,
    update_weight_handler,
};

/// Model calls for a long article can take a while
const OPENAI_TIMEOUT: Duration = Duration::from_secs(90);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
    pub admin_password: Arc<AdminPassword>,
    /// Upper bound for `GET /api/directory?limit=`
    pub directory_page_limit: i64,
}

impl AppState {
    pub fn new(deps: ServerDeps, config: &Config) -> Self {
        Self {
            deps: Arc::new(deps),
            jwt_service: Arc::new(JwtService::new(
                &config.jwt_secret,
                config.jwt_issuer.clone(),
            )),
            admin_password: Arc::new(config.admin_password.clone()),
            directory_page_limit: config.directory_page_limit,
        }
    }
}

/// Wire production implementations of every kernel dependency.
pub fn build_server_deps(config: &Config, pool: PgPool) -> Result<ServerDeps> {
    let openai = OpenAIClient::new(config.openai_api_key.clone())
        .with_timeout(OPENAI_TIMEOUT)
        .context("Failed to create OpenAI client")?;
    let page_fetcher = HttpPageFetcher::new()?;

    Ok(ServerDeps::new(
        pool.clone(),
        Arc::new(OpenAIService::new(openai, config.openai_model.clone())),
        Arc::new(page_fetcher),
        Arc::new(PgExposureStore::new(pool)),
        ViewCountBuffer::new(),
        RankingConfig::default(),
    ))
}

/// Build the Axum application router
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Clone jwt_service for middleware closure
    let jwt_service_for_middleware = state.jwt_service.clone();

    let admin = Router::new()
        .route("/directory", post(create_entry_handler))
        .route("/directory/:id/weight", put(update_weight_handler))
        .route("/directory/:id/tier", put(set_tier_handler))
        .route("/directory/:id/reset", post(reset_counters_handler))
        .route("/news/ingest", post(ingest_news_handler))
        .route("/news", post(publish_news_handler))
        .route_layer(middleware::from_fn(require_admin))
        // Login sits outside the admin gate
        .route("/login", post(login_handler));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/directory", get(list_directory_handler))
        .route("/api/directory/:id", get(get_directory_entry_handler))
        .route("/api/news", get(list_news_handler))
        .route("/api/news/categories", get(list_categories_handler))
        .route("/api/news/:id", get(get_news_handler))
        .nest("/api/admin", admin)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
