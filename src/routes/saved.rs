use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::views::StartupView;
use super::ApiJson;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::funding::{self, SaveOutcome};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SavedStartupRequest {
    /// Startup id
    pub startup: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// The caller's saved startups, most recently saved first
#[utoipa::path(
    get,
    path = "/api/investors/saved",
    params(("x-user-id" = i32, Header, description = "Authenticated investor id")),
    responses(
        (status = 200, description = "Saved startups", body = [StartupView]),
        (status = 403, description = "Caller is not an investor")
    )
)]
pub async fn list_saved(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<StartupView>>, AppError> {
    let investor = user.investor()?;
    let startups = funding::list_saved(&state.db, investor).await?;
    Ok(Json(startups.into_iter().map(StartupView::from).collect()))
}

/// Bookmark a startup
#[utoipa::path(
    post,
    path = "/api/investors/saved",
    params(("x-user-id" = i32, Header, description = "Authenticated investor id")),
    request_body = SavedStartupRequest,
    responses(
        (status = 201, description = "Startup saved", body = StartupView),
        (status = 200, description = "Startup was already saved", body = StartupView),
        (status = 404, description = "Unknown startup")
    )
)]
pub async fn save_startup(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(payload): ApiJson<SavedStartupRequest>,
) -> Result<(StatusCode, Json<StartupView>), AppError> {
    let investor = user.investor()?;
    let (startup, outcome) = funding::save_startup(&state.db, investor, payload.startup).await?;
    let status = match outcome {
        SaveOutcome::Created => StatusCode::CREATED,
        SaveOutcome::AlreadySaved => StatusCode::OK,
    };
    Ok((status, Json(startup.into())))
}

/// Remove a bookmark
#[utoipa::path(
    delete,
    path = "/api/investors/saved",
    params(("x-user-id" = i32, Header, description = "Authenticated investor id")),
    request_body = SavedStartupRequest,
    responses(
        (status = 200, description = "Startup removed from saved list", body = MessageResponse),
        (status = 404, description = "Startup was not saved")
    )
)]
pub async fn unsave_startup(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(payload): ApiJson<SavedStartupRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let investor = user.investor()?;
    funding::unsave_startup(&state.db, investor, payload.startup).await?;
    Ok(Json(MessageResponse {
        message: "Startup removed from saved list".to_string(),
    }))
}
