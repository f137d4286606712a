#![allow(dead_code)]

use std::sync::Once;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fundbridge::auth::{FounderId, InvestorId, USER_ID_HEADER};
use fundbridge::config::Config;
use fundbridge::entities::{startup, Role};
use fundbridge::funding::{self, NewStartup};
use fundbridge::{connect_database, create_app, AppState};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

static INIT: Once = Once::new();

pub fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

/// Fresh, migrated in-memory database.
pub async fn test_db() -> DatabaseConnection {
    setup();
    connect_database("sqlite::memory:")
        .await
        .expect("in-memory database")
}

/// Migrated SQLite database in a temp file, served by a multi-connection pool.
/// Keep the `TempDir` alive for as long as the connection is used.
pub async fn file_db() -> (tempfile::TempDir, DatabaseConnection) {
    setup();
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("fundbridge.sqlite").display());
    let db = connect_database(&url).await.expect("file database");
    (dir, db)
}

pub fn test_app(db: DatabaseConnection) -> Router {
    create_app(AppState::new(db, Config::default()))
}

pub async fn founder(db: &DatabaseConnection, username: &str) -> FounderId {
    let user = funding::register_user(db, username, Role::Founder).await.unwrap();
    FounderId(user.id)
}

pub async fn investor(db: &DatabaseConnection, username: &str) -> InvestorId {
    let user = funding::register_user(db, username, Role::Investor).await.unwrap();
    InvestorId(user.id)
}

pub async fn listed_startup(db: &DatabaseConnection, owner: FounderId, name: &str, goal: i64) -> startup::Model {
    funding::create_startup(
        db,
        owner,
        NewStartup {
            name: name.to_string(),
            funding_goal: Decimal::from(goal),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

/// Send one request through the router and decode the JSON body (Null when empty or not JSON).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user_id: Option<i32>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header(USER_ID_HEADER, id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
