use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::entities::{user, Role, User};
use crate::error::AppError;

const MAX_USERNAME_LEN: usize = 150;

/// Create an account for an identity managed by the upstream authenticator.
#[tracing::instrument(skip(db))]
pub async fn register_user(
    db: &DatabaseConnection,
    username: &str,
    role: Role,
) -> Result<user::Model, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidRequest("username is required".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::InvalidRequest(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }

    let taken = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .is_some();
    if taken {
        return Err(AppError::InvalidRequest("Username already exists".to_string()));
    }

    let inserted = user::ActiveModel {
        username: Set(username.to_string()),
        role: Set(role),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await;

    match inserted {
        Ok(model) => {
            tracing::info!(user_id = model.id, "registered user");
            Ok(model)
        }
        // Lost a race with a concurrent signup for the same name
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(AppError::InvalidRequest("Username already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
