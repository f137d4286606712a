use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::views::RequestView;
use super::{ApiJson, ApiPath, ApiQuery};
use crate::auth::CurrentUser;
use crate::entities::RequestStatus;
use crate::error::AppError;
use crate::funding::{self, Decision};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvestmentRequest {
    /// Startup to invest in
    pub startup_id: i32,
    /// Amount offered; positive and at most the startup's remaining capacity
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecideRequest {
    /// `accepted` or `rejected`
    pub status: RequestStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DecisionResponse {
    pub message: String,
    pub request: RequestView,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FounderRequestsQuery {
    /// Optional: only requests in this state
    #[param(required = false)]
    pub status: Option<RequestStatus>,
}

/// Submit an investment request against a startup
#[utoipa::path(
    post,
    path = "/api/investors/requests",
    params(("x-user-id" = i32, Header, description = "Authenticated investor id")),
    request_body = CreateInvestmentRequest,
    responses(
        (status = 201, description = "Pending request created", body = RequestView),
        (status = 400, description = "Non-positive amount, amount above remaining capacity, or unknown startup"),
        (status = 403, description = "Caller is not an investor")
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(payload): ApiJson<CreateInvestmentRequest>,
) -> Result<(StatusCode, Json<RequestView>), AppError> {
    let investor = user.investor()?;
    let request =
        funding::create_request(&state.db, investor, payload.startup_id, payload.amount).await?;

    let record = funding::get_request_record(&state.db, request.id).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// The caller's investment requests, newest first
#[utoipa::path(
    get,
    path = "/api/investors/requests",
    params(("x-user-id" = i32, Header, description = "Authenticated investor id")),
    responses(
        (status = 200, description = "Investor's requests", body = [RequestView]),
        (status = 403, description = "Caller is not an investor")
    )
)]
pub async fn list_my_requests(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<RequestView>>, AppError> {
    let investor = user.investor()?;
    let records = funding::list_investor_requests(&state.db, investor).await?;
    Ok(Json(records.into_iter().map(RequestView::from).collect()))
}

/// Requests received on the caller's startups, newest first
#[utoipa::path(
    get,
    path = "/api/investors/founder/requests",
    params(
        FounderRequestsQuery,
        ("x-user-id" = i32, Header, description = "Authenticated founder id")
    ),
    responses(
        (status = 200, description = "Incoming requests", body = [RequestView]),
        (status = 403, description = "Caller is not a founder")
    )
)]
pub async fn list_founder_requests(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<FounderRequestsQuery>,
) -> Result<Json<Vec<RequestView>>, AppError> {
    let founder = user.founder()?;
    let records = funding::list_founder_requests(&state.db, founder, query.status).await?;
    Ok(Json(records.into_iter().map(RequestView::from).collect()))
}

/// Accept or reject a pending request on one of the caller's startups
#[utoipa::path(
    patch,
    path = "/api/investors/founder/requests/{id}",
    params(
        ("id" = i32, Path, description = "Investment request id"),
        ("x-user-id" = i32, Header, description = "Authenticated founder id")
    ),
    request_body = DecideRequest,
    responses(
        (status = 200, description = "Request decided", body = DecisionResponse),
        (status = 400, description = "Invalid status, already decided, or capacity exceeded"),
        (status = 403, description = "Caller is not a founder"),
        (status = 404, description = "Unknown request or not on the caller's startup")
    )
)]
pub async fn decide_request(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<DecideRequest>,
) -> Result<Json<DecisionResponse>, AppError> {
    let founder = user.founder()?;
    let decision = Decision::try_from(payload.status)?;
    let decided = funding::decide_request(&state.db, founder, id, decision).await?;

    let record = funding::get_request_record(&state.db, decided.id).await?;

    let message = match decision {
        Decision::Accept => "Investment request accepted",
        Decision::Reject => "Investment request rejected",
    };
    Ok(Json(DecisionResponse {
        message: message.to_string(),
        request: record.into(),
    }))
}

/// The caller's accepted investments, newest first
#[utoipa::path(
    get,
    path = "/api/investors/my-investments",
    params(("x-user-id" = i32, Header, description = "Authenticated investor id")),
    responses(
        (status = 200, description = "Accepted requests", body = [RequestView]),
        (status = 403, description = "Caller is not an investor")
    )
)]
pub async fn my_investments(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<RequestView>>, AppError> {
    let investor = user.investor()?;
    let records = funding::list_investments(&state.db, investor).await?;
    Ok(Json(records.into_iter().map(RequestView::from).collect()))
}
