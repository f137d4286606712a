use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};

use super::views::StartupView;
use super::{ApiJson, ApiPath, ApiQuery};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::funding::{self, BrowseFilter, NewStartup, StartupChanges};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStartupRequest {
    pub name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub stage: String,
    /// Total amount sought, must be positive
    pub funding_goal: Decimal,
    /// Percentage of equity offered, in (0, 100]
    #[serde(default)]
    pub equity: Option<Decimal>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub team_size: Option<i32>,
    #[serde(default)]
    pub location: String,
}

impl From<CreateStartupRequest> for NewStartup {
    fn from(req: CreateStartupRequest) -> Self {
        Self {
            name: req.name,
            industry: req.industry,
            stage: req.stage,
            funding_goal: req.funding_goal,
            equity: req.equity,
            description: req.description,
            website: req.website,
            team_size: req.team_size,
            location: req.location,
        }
    }
}

/// Partial update; omitted fields keep their value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateStartupRequest {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub stage: Option<String>,
    pub funding_goal: Option<Decimal>,
    /// Omit to keep, `null` to clear, or a percentage in (0, 100]
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<Decimal>)]
    pub equity: Option<Option<Decimal>>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub team_size: Option<i32>,
    pub location: Option<String>,
}

/// Marks a field that appeared in the body, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdateStartupRequest> for StartupChanges {
    fn from(req: UpdateStartupRequest) -> Self {
        Self {
            name: req.name,
            industry: req.industry,
            stage: req.stage,
            funding_goal: req.funding_goal,
            equity: req.equity,
            description: req.description,
            website: req.website,
            team_size: req.team_size,
            location: req.location,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BrowseQuery {
    /// Optional: only startups in this industry (case-insensitive)
    #[param(required = false)]
    pub industry: Option<String>,
    /// Optional: only startups at this stage (case-insensitive)
    #[param(required = false)]
    pub stage: Option<String>,
}

/// List the caller's own startups, newest first
#[utoipa::path(
    get,
    path = "/api/startups",
    params(("x-user-id" = i32, Header, description = "Authenticated founder id")),
    responses(
        (status = 200, description = "Founder's startups", body = [StartupView]),
        (status = 403, description = "Caller is not a founder")
    )
)]
pub async fn list_my_startups(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<StartupView>>, AppError> {
    let founder = user.founder()?;
    let startups = funding::list_founder_startups(&state.db, founder).await?;
    Ok(Json(startups.into_iter().map(StartupView::from).collect()))
}

/// List a new startup seeking funding
#[utoipa::path(
    post,
    path = "/api/startups",
    params(("x-user-id" = i32, Header, description = "Authenticated founder id")),
    request_body = CreateStartupRequest,
    responses(
        (status = 201, description = "Startup created", body = StartupView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Caller is not a founder")
    )
)]
pub async fn create_startup(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(payload): ApiJson<CreateStartupRequest>,
) -> Result<(StatusCode, Json<StartupView>), AppError> {
    let founder = user.founder()?;
    let startup = funding::create_startup(&state.db, founder, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(startup.into())))
}

/// Fetch one startup
#[utoipa::path(
    get,
    path = "/api/startups/{id}",
    params(
        ("id" = i32, Path, description = "Startup id"),
        ("x-user-id" = i32, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Startup", body = StartupView),
        (status = 404, description = "Unknown startup")
    )
)]
pub async fn get_startup(
    State(state): State<AppState>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<StartupView>, AppError> {
    let startup = funding::get_startup(&state.db, id).await?;
    Ok(Json(startup.into()))
}

/// Update one of the caller's startups
#[utoipa::path(
    put,
    path = "/api/startups/{id}",
    params(
        ("id" = i32, Path, description = "Startup id"),
        ("x-user-id" = i32, Header, description = "Authenticated founder id")
    ),
    request_body = UpdateStartupRequest,
    responses(
        (status = 200, description = "Startup updated", body = StartupView),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Unknown startup or not owned by caller")
    )
)]
pub async fn update_startup(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<UpdateStartupRequest>,
) -> Result<Json<StartupView>, AppError> {
    let founder = user.founder()?;
    let startup = funding::update_startup(&state.db, founder, id, payload.into()).await?;
    Ok(Json(startup.into()))
}

/// Browse every listed startup, newest first
#[utoipa::path(
    get,
    path = "/api/investors/browse",
    params(
        BrowseQuery,
        ("x-user-id" = i32, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Startups", body = [StartupView])
    )
)]
pub async fn browse_startups(
    State(state): State<AppState>,
    _user: CurrentUser,
    ApiQuery(query): ApiQuery<BrowseQuery>,
) -> Result<Json<Vec<StartupView>>, AppError> {
    let filter = BrowseFilter {
        industry: query.industry,
        stage: query.stage,
    };
    let startups = funding::browse_startups(&state.db, filter).await?;
    Ok(Json(startups.into_iter().map(StartupView::from).collect()))
}
