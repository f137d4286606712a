use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::auth::FounderId;
use crate::entities::{startup, Startup};
use crate::error::AppError;
use crate::funding::money::{check_money, MONEY_SCALE};

/// Fields a founder supplies when listing a startup. `amount_raised` always starts at zero.
#[derive(Debug, Clone, Default)]
pub struct NewStartup {
    pub name: String,
    pub industry: String,
    pub stage: String,
    pub funding_goal: Decimal,
    pub equity: Option<Decimal>,
    pub description: String,
    pub website: String,
    pub team_size: Option<i32>,
    pub location: String,
}

/// Partial update; `None` leaves the stored value untouched.
/// `equity: Some(None)` clears the stake.
#[derive(Debug, Clone, Default)]
pub struct StartupChanges {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub stage: Option<String>,
    pub funding_goal: Option<Decimal>,
    pub equity: Option<Option<Decimal>>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub team_size: Option<i32>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseFilter {
    pub industry: Option<String>,
    pub stage: Option<String>,
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidRequest("name is required".to_string()));
    }
    Ok(())
}

fn validate_funding_goal(goal: Decimal) -> Result<(), AppError> {
    if goal <= Decimal::ZERO {
        return Err(AppError::InvalidRequest(
            "funding_goal must be greater than 0".to_string(),
        ));
    }
    check_money(goal, "funding_goal")
}

fn validate_equity(equity: Option<Decimal>) -> Result<(), AppError> {
    match equity {
        Some(e) if e <= Decimal::ZERO || e > Decimal::ONE_HUNDRED => Err(AppError::InvalidRequest(
            "equity must be a percentage in (0, 100]".to_string(),
        )),
        Some(e) if e.normalize().scale() > MONEY_SCALE => Err(AppError::InvalidRequest(format!(
            "equity must have at most {MONEY_SCALE} decimal places"
        ))),
        _ => Ok(()),
    }
}

fn validate_team_size(team_size: Option<i32>) -> Result<(), AppError> {
    match team_size {
        Some(n) if n < 0 => Err(AppError::InvalidRequest(
            "team_size cannot be negative".to_string(),
        )),
        _ => Ok(()),
    }
}

#[tracing::instrument(skip(db, new), fields(founder_id = founder.0, name = %new.name))]
pub async fn create_startup(
    db: &DatabaseConnection,
    founder: FounderId,
    new: NewStartup,
) -> Result<startup::Model, AppError> {
    validate_name(&new.name)?;
    validate_funding_goal(new.funding_goal)?;
    validate_equity(new.equity)?;
    validate_team_size(new.team_size)?;

    let model = startup::ActiveModel {
        founder_id: Set(Some(founder.0)),
        name: Set(new.name.trim().to_string()),
        industry: Set(new.industry),
        stage: Set(new.stage),
        funding_goal: Set(new.funding_goal),
        amount_raised: Set(Decimal::ZERO),
        equity: Set(new.equity),
        description: Set(new.description),
        website: Set(new.website),
        team_size: Set(new.team_size),
        location: Set(new.location),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(startup_id = model.id, "startup listed");
    Ok(model)
}

/// The founder's own listings, newest first.
pub async fn list_founder_startups(
    db: &DatabaseConnection,
    founder: FounderId,
) -> Result<Vec<startup::Model>, AppError> {
    let startups = Startup::find()
        .filter(startup::Column::FounderId.eq(founder.0))
        .order_by_desc(startup::Column::CreatedAt)
        .order_by_desc(startup::Column::Id)
        .all(db)
        .await?;
    Ok(startups)
}

pub async fn get_startup(db: &DatabaseConnection, startup_id: i32) -> Result<startup::Model, AppError> {
    Startup::find_by_id(startup_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("startup {startup_id}")))
}

/// Apply a founder's partial update.
///
/// The goal can never drop below what has been raised: the row is locked
/// for the transaction (on backends with row locks) and the write itself is
/// guarded on `amount_raised <= funding_goal`, so an acceptance landing in
/// between is either seen or makes the update fail.
#[tracing::instrument(skip(db, changes), fields(founder_id = founder.0))]
pub async fn update_startup(
    db: &DatabaseConnection,
    founder: FounderId,
    startup_id: i32,
    changes: StartupChanges,
) -> Result<startup::Model, AppError> {
    if let Some(name) = &changes.name {
        validate_name(name)?;
    }
    if let Some(goal) = changes.funding_goal {
        validate_funding_goal(goal)?;
    }
    if let Some(equity) = changes.equity {
        validate_equity(equity)?;
    }
    validate_team_size(changes.team_size)?;

    let txn = db.begin().await?;

    let mut query = Startup::find_by_id(startup_id);
    if txn.get_database_backend() != DbBackend::Sqlite {
        query = query.lock_exclusive();
    }
    let existing = query
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("startup {startup_id}")))?;
    if !existing.is_owned_by(founder.0) {
        return Err(AppError::NotFound(format!("startup {startup_id}")));
    }

    if let Some(goal) = changes.funding_goal {
        if goal < existing.amount_raised {
            return Err(goal_below_raised(existing.amount_raised));
        }
    }

    let mut active = <startup::ActiveModel as Default>::default();
    if let Some(name) = changes.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(industry) = changes.industry {
        active.industry = Set(industry);
    }
    if let Some(stage) = changes.stage {
        active.stage = Set(stage);
    }
    if let Some(goal) = changes.funding_goal {
        active.funding_goal = Set(goal);
    }
    if let Some(equity) = changes.equity {
        active.equity = Set(equity);
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(website) = changes.website {
        active.website = Set(website);
    }
    if let Some(team_size) = changes.team_size {
        active.team_size = Set(Some(team_size));
    }
    if let Some(location) = changes.location {
        active.location = Set(location);
    }

    if !active.is_changed() {
        return Ok(existing);
    }

    let mut update = Startup::update_many()
        .set(active)
        .filter(startup::Column::Id.eq(existing.id));
    if let Some(goal) = changes.funding_goal {
        update = update.filter(startup::Column::AmountRaised.lte(goal));
    }
    let written = update.exec(&txn).await?.rows_affected;
    if written == 0 {
        // Dropping `txn` discards the update.
        let raised = Startup::find_by_id(existing.id)
            .one(&txn)
            .await?
            .map_or(existing.amount_raised, |s| s.amount_raised);
        tracing::warn!(startup_id = existing.id, %raised, "goal update refused: funding moved");
        return Err(goal_below_raised(raised));
    }

    let updated = Startup::find_by_id(existing.id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("startup {startup_id}")))?;
    txn.commit().await?;

    tracing::info!(startup_id = updated.id, "startup updated");
    Ok(updated)
}

fn goal_below_raised(raised: Decimal) -> AppError {
    AppError::InvalidRequest(format!(
        "funding_goal cannot be lower than the {raised} already raised"
    ))
}

/// Every listing, newest first, optionally narrowed by industry/stage (case-insensitive).
pub async fn browse_startups(
    db: &DatabaseConnection,
    filter: BrowseFilter,
) -> Result<Vec<startup::Model>, AppError> {
    let mut query = Startup::find();

    if let Some(industry) = filter.industry.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(
            Expr::expr(Func::lower(Expr::col(startup::Column::Industry))).eq(industry.to_lowercase()),
        );
    }
    if let Some(stage) = filter.stage.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(
            Expr::expr(Func::lower(Expr::col(startup::Column::Stage))).eq(stage.to_lowercase()),
        );
    }

    let startups = query
        .order_by_desc(startup::Column::CreatedAt)
        .order_by_desc(startup::Column::Id)
        .all(db)
        .await?;
    Ok(startups)
}
