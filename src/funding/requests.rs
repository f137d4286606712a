use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::auth::{FounderId, InvestorId};
use crate::entities::{investment_request, startup, user, InvestmentRequest, RequestStatus, Startup, User};
use crate::error::AppError;
use crate::funding::money::check_money;

/// A request together with the records it points at.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub request: investment_request::Model,
    pub startup: startup::Model,
    pub investor: user::Model,
}

/// Check a proposed amount against what the startup can still take.
pub(crate) fn check_amount(amount: Decimal, remaining: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidRequest(
            "Amount must be greater than 0.".to_string(),
        ));
    }
    check_money(amount, "amount")?;
    if amount > remaining {
        return Err(AppError::InvalidRequest(format!(
            "This startup only has {remaining} left to raise."
        )));
    }
    Ok(())
}

/// Record a pending request. Capacity is checked against the startup's current totals;
/// the founder's acceptance re-checks it.
#[tracing::instrument(skip(db), fields(investor_id = investor.0))]
pub async fn create_request(
    db: &DatabaseConnection,
    investor: InvestorId,
    startup_id: i32,
    amount: Decimal,
) -> Result<investment_request::Model, AppError> {
    let startup = Startup::find_by_id(startup_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::InvalidRequest(format!("startup {startup_id} does not exist")))?;

    if let Err(e) = check_amount(amount, startup.remaining_capacity()) {
        tracing::warn!(error = %e, "investment request refused");
        return Err(e);
    }

    let request = investment_request::ActiveModel {
        investor_id: Set(investor.0),
        startup_id: Set(startup.id),
        amount: Set(amount),
        status: Set(RequestStatus::Pending),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(request_id = request.id, "investment request created");
    Ok(request)
}

/// Attach startup and investor records, keeping the input order.
async fn load_records(
    db: &DatabaseConnection,
    rows: Vec<(investment_request::Model, Option<startup::Model>)>,
) -> Result<Vec<RequestRecord>, AppError> {
    let mut investor_ids: Vec<i32> = rows.iter().map(|(r, _)| r.investor_id).collect();
    investor_ids.sort_unstable();
    investor_ids.dedup();

    let investors: HashMap<i32, user::Model> = if investor_ids.is_empty() {
        HashMap::new()
    } else {
        User::find()
            .filter(user::Column::Id.is_in(investor_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect()
    };

    rows.into_iter()
        .map(|(request, startup)| {
            let startup = startup.ok_or_else(|| {
                AppError::InternalError(format!("request {} has no startup", request.id))
            })?;
            let investor = investors.get(&request.investor_id).cloned().ok_or_else(|| {
                AppError::InternalError(format!("request {} has no investor", request.id))
            })?;
            Ok(RequestRecord {
                request,
                startup,
                investor,
            })
        })
        .collect()
}

/// One request with its startup and investor.
pub async fn get_request_record(
    db: &DatabaseConnection,
    request_id: i32,
) -> Result<RequestRecord, AppError> {
    let row = InvestmentRequest::find_by_id(request_id)
        .find_also_related(Startup)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("investment request {request_id}")))?;
    load_records(db, vec![row])
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound(format!("investment request {request_id}")))
}

/// Requests the investor has made, newest first.
pub async fn list_investor_requests(
    db: &DatabaseConnection,
    investor: InvestorId,
) -> Result<Vec<RequestRecord>, AppError> {
    let rows = InvestmentRequest::find()
        .find_also_related(Startup)
        .filter(investment_request::Column::InvestorId.eq(investor.0))
        .order_by_desc(investment_request::Column::CreatedAt)
        .order_by_desc(investment_request::Column::Id)
        .all(db)
        .await?;
    load_records(db, rows).await
}

/// Requests against any startup the founder owns, newest first.
pub async fn list_founder_requests(
    db: &DatabaseConnection,
    founder: FounderId,
    status: Option<RequestStatus>,
) -> Result<Vec<RequestRecord>, AppError> {
    let mut query = InvestmentRequest::find()
        .find_also_related(Startup)
        .filter(startup::Column::FounderId.eq(founder.0));
    if let Some(status) = status {
        query = query.filter(investment_request::Column::Status.eq(status));
    }

    let rows = query
        .order_by_desc(investment_request::Column::CreatedAt)
        .order_by_desc(investment_request::Column::Id)
        .all(db)
        .await?;
    load_records(db, rows).await
}

/// The investor's accepted requests, newest first.
pub async fn list_investments(
    db: &DatabaseConnection,
    investor: InvestorId,
) -> Result<Vec<RequestRecord>, AppError> {
    let rows = InvestmentRequest::find()
        .find_also_related(Startup)
        .filter(investment_request::Column::InvestorId.eq(investor.0))
        .filter(investment_request::Column::Status.eq(RequestStatus::Accepted))
        .order_by_desc(investment_request::Column::CreatedAt)
        .order_by_desc(investment_request::Column::Id)
        .all(db)
        .await?;
    load_records(db, rows).await
}
