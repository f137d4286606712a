use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use super::views::UserView;
use super::ApiJson;
use crate::auth::CurrentUser;
use crate::entities::Role;
use crate::error::AppError;
use crate::{funding, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    /// Unique login name issued by the identity provider
    pub username: String,
    pub role: Role,
}

/// Register an account and its marketplace role
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User created", body = UserView),
        (status = 400, description = "Missing username or username already exists")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    let user = funding::register_user(&state.db, &payload.username, payload.role).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// The authenticated caller
#[utoipa::path(
    get,
    path = "/api/me",
    params(("x-user-id" = i32, Header, description = "Authenticated user id")),
    responses(
        (status = 200, description = "Current user", body = CurrentUser),
        (status = 401, description = "No or unknown identity")
    )
)]
pub async fn me(user: CurrentUser) -> Json<CurrentUser> {
    Json(user)
}
