//! Founder decisions on investment requests.
//!
//! `pending -> accepted | rejected`, both terminal. Acceptance re-reads the
//! startup's totals under a row lock and moves the request status and the
//! raised amount in one transaction.

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};

use crate::auth::FounderId;
use crate::entities::{investment_request, startup, InvestmentRequest, RequestStatus, Startup};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn target_status(self) -> RequestStatus {
        match self {
            Decision::Accept => RequestStatus::Accepted,
            Decision::Reject => RequestStatus::Rejected,
        }
    }
}

impl TryFrom<RequestStatus> for Decision {
    type Error = AppError;

    fn try_from(status: RequestStatus) -> Result<Self, Self::Error> {
        match status {
            RequestStatus::Accepted => Ok(Decision::Accept),
            RequestStatus::Rejected => Ok(Decision::Reject),
            RequestStatus::Pending => Err(AppError::InvalidRequest(
                "status must be 'accepted' or 'rejected'".to_string(),
            )),
        }
    }
}

/// Apply the founder's decision to a pending request.
///
/// Fails with `NotFound` when the request is unknown or belongs to another
/// founder's startup, and with `Conflict` when the request was already decided
/// or, on acceptance, its amount exceeds the capacity left right now.
#[tracing::instrument(skip(db), fields(founder_id = founder.0))]
pub async fn decide_request(
    db: &DatabaseConnection,
    founder: FounderId,
    request_id: i32,
    decision: Decision,
) -> Result<investment_request::Model, AppError> {
    let txn = db.begin().await?;

    let request = InvestmentRequest::find_by_id(request_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("investment request {request_id}")))?;

    // Serializes decisions per startup. SQLite has no row locks; it already
    // allows a single writer per database.
    let mut startup_query = Startup::find_by_id(request.startup_id);
    if txn.get_database_backend() != DbBackend::Sqlite {
        startup_query = startup_query.lock_exclusive();
    }
    let startup = startup_query
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("investment request {request_id}")))?;

    if !startup.is_owned_by(founder.0) {
        return Err(AppError::NotFound(format!("investment request {request_id}")));
    }

    if request.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "investment request {request_id} has already been decided"
        )));
    }

    if decision == Decision::Accept {
        let remaining = startup.remaining_capacity();
        if request.amount > remaining {
            tracing::warn!(
                startup_id = startup.id,
                amount = %request.amount,
                %remaining,
                "acceptance refused: capacity exceeded"
            );
            return Err(AppError::Conflict(format!(
                "Cannot accept {}: this startup only has {} left to raise.",
                request.amount, remaining
            )));
        }
    }

    // Guarded on `pending` so a request is decided exactly once.
    let moved = InvestmentRequest::update_many()
        .set(investment_request::ActiveModel {
            status: Set(decision.target_status()),
            ..Default::default()
        })
        .filter(investment_request::Column::Id.eq(request.id))
        .filter(investment_request::Column::Status.eq(RequestStatus::Pending))
        .exec(&txn)
        .await?
        .rows_affected;
    if moved == 0 {
        return Err(AppError::Conflict(format!(
            "investment request {request_id} has already been decided"
        )));
    }

    if decision == Decision::Accept {
        let raised: Decimal = startup.amount_raised + request.amount;
        let credited = Startup::update_many()
            .set(startup::ActiveModel {
                amount_raised: Set(raised),
                ..Default::default()
            })
            .filter(startup::Column::Id.eq(startup.id))
            .filter(startup::Column::AmountRaised.eq(startup.amount_raised))
            .filter(startup::Column::FundingGoal.gte(raised))
            .exec(&txn)
            .await?
            .rows_affected;
        if credited == 0 {
            // Dropping `txn` rolls the status change back.
            return Err(AppError::Conflict(format!(
                "funding for startup {} changed concurrently; retry the decision",
                startup.id
            )));
        }
        tracing::info!(startup_id = startup.id, amount_raised = %raised, "startup funding updated");
    }

    txn.commit().await?;

    tracing::info!(
        request_id,
        status = ?decision.target_status(),
        "investment request decided"
    );

    Ok(investment_request::Model {
        status: decision.target_status(),
        ..request
    })
}
