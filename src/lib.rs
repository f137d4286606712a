use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod funding;
pub mod routes;

use config::Config;
use migration::{Migrator, MigratorTrait};

/// Shared handler state: the connection pool and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Connect to the configured database and bring the schema up to date.
pub async fn connect_database(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    // Each in-memory SQLite connection is its own database
    if database_url.starts_with("sqlite") && database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("database ready");
    Ok(db)
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FUNDBRIDGE API",
        version = "0.1.0",
        description = "Founders list startups seeking funding; investors browse, bookmark and request investments; founders accept or reject requests."
    ),
    paths(
        routes::health::health_check,
        routes::accounts::register_user,
        routes::accounts::me,
        routes::startups::list_my_startups,
        routes::startups::create_startup,
        routes::startups::get_startup,
        routes::startups::update_startup,
        routes::startups::browse_startups,
        routes::requests::create_request,
        routes::requests::list_my_requests,
        routes::requests::list_founder_requests,
        routes::requests::decide_request,
        routes::requests::my_investments,
        routes::saved::list_saved,
        routes::saved::save_startup,
        routes::saved::unsave_startup
    ),
    components(schemas(
        auth::CurrentUser,
        entities::Role,
        entities::RequestStatus,
        routes::views::UserView,
        routes::views::InvestorSummary,
        routes::views::StartupView,
        routes::views::RequestView,
        routes::accounts::RegisterUserRequest,
        routes::startups::CreateStartupRequest,
        routes::startups::UpdateStartupRequest,
        routes::requests::CreateInvestmentRequest,
        routes::requests::DecideRequest,
        routes::requests::DecisionResponse,
        routes::saved::SavedStartupRequest,
        routes::saved::MessageResponse
    ))
)]
pub struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let api_doc = ApiDoc::openapi();

    let api_routes = Router::new()
        .route("/users", post(routes::register_user))
        .route("/me", get(routes::me))
        .route(
            "/startups",
            get(routes::list_my_startups).post(routes::create_startup),
        )
        .route(
            "/startups/{id}",
            get(routes::get_startup).put(routes::update_startup),
        )
        .route("/investors/browse", get(routes::browse_startups))
        .route(
            "/investors/requests",
            get(routes::list_my_requests).post(routes::create_request),
        )
        .route(
            "/investors/founder/requests",
            get(routes::list_founder_requests),
        )
        .route(
            "/investors/founder/requests/{id}",
            patch(routes::decide_request),
        )
        .route("/investors/my-investments", get(routes::my_investments))
        .route(
            "/investors/saved",
            get(routes::list_saved)
                .post(routes::save_startup)
                .delete(routes::unsave_startup),
        );

    let mut api_routes = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(routes::health_check));

    // Rate limit the API only; docs stay reachable.
    if let Some(limit) = state.config.rate_limit {
        let period_ms = (60_000 / limit.per_minute).max(1);
        match GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .period(std::time::Duration::from_millis(period_ms))
            .burst_size(limit.burst)
            .finish()
        {
            Some(governor_conf) => {
                api_routes = api_routes.layer(GovernorLayer {
                    config: Arc::new(governor_conf),
                });
            }
            None => tracing::warn!(?limit, "invalid rate limit configuration; rate limiting disabled"),
        }
    }

    let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", api_doc);

    Router::new()
        .merge(api_routes)
        .merge(docs_router)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
