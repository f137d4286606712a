use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::auth::InvestorId;
use crate::entities::{saved_startup, startup, SavedStartup, Startup};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    AlreadySaved,
}

async fn find_bookmark(
    db: &DatabaseConnection,
    investor: InvestorId,
    startup_id: i32,
) -> Result<Option<saved_startup::Model>, AppError> {
    let bookmark = SavedStartup::find()
        .filter(saved_startup::Column::InvestorId.eq(investor.0))
        .filter(saved_startup::Column::StartupId.eq(startup_id))
        .one(db)
        .await?;
    Ok(bookmark)
}

/// Bookmark a startup. Saving twice is not an error.
#[tracing::instrument(skip(db), fields(investor_id = investor.0))]
pub async fn save_startup(
    db: &DatabaseConnection,
    investor: InvestorId,
    startup_id: i32,
) -> Result<(startup::Model, SaveOutcome), AppError> {
    let startup = Startup::find_by_id(startup_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("startup {startup_id}")))?;

    if find_bookmark(db, investor, startup_id).await?.is_some() {
        return Ok((startup, SaveOutcome::AlreadySaved));
    }

    let inserted = saved_startup::ActiveModel {
        investor_id: Set(investor.0),
        startup_id: Set(startup_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await;

    match inserted {
        Ok(_) => {
            tracing::info!(startup_id, "startup saved");
            Ok((startup, SaveOutcome::Created))
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Ok((startup, SaveOutcome::AlreadySaved))
        }
        Err(e) => Err(e.into()),
    }
}

#[tracing::instrument(skip(db), fields(investor_id = investor.0))]
pub async fn unsave_startup(
    db: &DatabaseConnection,
    investor: InvestorId,
    startup_id: i32,
) -> Result<(), AppError> {
    let bookmark = find_bookmark(db, investor, startup_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("startup {startup_id} is not saved")))?;
    bookmark.delete(db).await?;
    tracing::info!(startup_id, "startup unsaved");
    Ok(())
}

/// Saved startups, most recently saved first.
pub async fn list_saved(
    db: &DatabaseConnection,
    investor: InvestorId,
) -> Result<Vec<startup::Model>, AppError> {
    let rows = SavedStartup::find()
        .find_also_related(Startup)
        .filter(saved_startup::Column::InvestorId.eq(investor.0))
        .order_by_desc(saved_startup::Column::CreatedAt)
        .order_by_desc(saved_startup::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().filter_map(|(_, startup)| startup).collect())
}
