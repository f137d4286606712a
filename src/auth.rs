//! Caller identity.
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! user id in the `x-user-id` header. [`CurrentUser`] resolves that id to a
//! stored account, and the typed ids ([`FounderId`], [`InvestorId`]) carry the
//! role check into the funding operations.

use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::EntityTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{Role, User};
use crate::error::AppError;
use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Proof that the caller acts as a founder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FounderId(pub i32);

/// Proof that the caller acts as an investor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvestorId(pub i32);

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn founder(&self) -> Result<FounderId, AppError> {
        match self.role {
            Role::Founder => Ok(FounderId(self.id)),
            Role::Investor => Err(AppError::Forbidden("founder account required".to_string())),
        }
    }

    pub fn investor(&self) -> Result<InvestorId, AppError> {
        match self.role {
            Role::Investor => Ok(InvestorId(self.id)),
            Role::Founder => Err(AppError::Forbidden("investor account required".to_string())),
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthenticated("missing caller identity".to_string()))?;

        let user_id = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .ok_or_else(|| AppError::Unauthenticated("malformed caller identity".to_string()))?;

        let user = User::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("unknown user".to_string()))?;

        Ok(CurrentUser {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}
