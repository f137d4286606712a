use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{investment_request::RequestStatus, startup, user, Role};
use crate::funding::RequestRecord;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl From<user::Model> for UserView {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvestorSummary {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StartupView {
    pub id: i32,
    /// Owning founder's user id
    pub founder_id: Option<i32>,
    pub name: String,
    pub industry: String,
    pub stage: String,
    pub funding_goal: Decimal,
    pub amount_raised: Decimal,
    /// funding_goal - amount_raised, never negative
    pub remaining: Decimal,
    /// Percentage of equity offered
    pub equity: Option<Decimal>,
    /// funding_goal / (equity / 100); null without equity
    pub valuation: Option<Decimal>,
    pub description: String,
    pub website: String,
    pub team_size: Option<i32>,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl From<startup::Model> for StartupView {
    fn from(s: startup::Model) -> Self {
        let remaining = s.remaining_capacity();
        let valuation = s.valuation();
        Self {
            id: s.id,
            founder_id: s.founder_id,
            name: s.name,
            industry: s.industry,
            stage: s.stage,
            funding_goal: s.funding_goal,
            amount_raised: s.amount_raised,
            remaining,
            equity: s.equity,
            valuation,
            description: s.description,
            website: s.website,
            team_size: s.team_size,
            location: s.location,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestView {
    pub id: i32,
    pub startup: StartupView,
    pub investor: InvestorSummary,
    pub amount: Decimal,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl From<RequestRecord> for RequestView {
    fn from(record: RequestRecord) -> Self {
        let RequestRecord {
            request,
            startup,
            investor,
        } = record;
        Self {
            id: request.id,
            startup: startup.into(),
            investor: InvestorSummary {
                id: investor.id,
                username: investor.username,
            },
            amount: request.amount,
            status: request.status,
            created_at: request.created_at,
        }
    }
}
