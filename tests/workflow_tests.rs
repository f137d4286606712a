mod common;

use common::{founder, investor, listed_startup, test_db};
use fundbridge::entities::{investment_request, RequestStatus, Startup};
use fundbridge::error::AppError;
use fundbridge::funding::{self, Decision};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait};

fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

async fn raised(db: &DatabaseConnection, startup_id: i32) -> Decimal {
    Startup::find_by_id(startup_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .amount_raised
}

/// Sum of accepted request amounts for a startup, read back from the ledger.
async fn accepted_total(db: &DatabaseConnection, startup_id: i32) -> Decimal {
    investment_request::Entity::find()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.startup_id == startup_id && r.status == RequestStatus::Accepted)
        .map(|r| r.amount)
        .sum()
}

#[tokio::test]
async fn funding_round_scenario() {
    let db = test_db().await;
    let f = founder(&db, "founder").await;
    let s = listed_startup(&db, f, "Acme", 100_000).await;
    let a = investor(&db, "a").await;
    let b = investor(&db, "b").await;
    let c = investor(&db, "c").await;
    let d = investor(&db, "d").await;

    let req_a = funding::create_request(&db, a, s.id, dec(60_000)).await.unwrap();
    assert_eq!(req_a.status, RequestStatus::Pending);
    funding::decide_request(&db, f, req_a.id, Decision::Accept).await.unwrap();
    assert_eq!(raised(&db, s.id).await, dec(60_000));

    let err = funding::create_request(&db, b, s.id, dec(50_000)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));
    assert!(err.to_string().contains("40000"));

    let req_c = funding::create_request(&db, c, s.id, dec(40_000)).await.unwrap();
    funding::decide_request(&db, f, req_c.id, Decision::Accept).await.unwrap();
    assert_eq!(raised(&db, s.id).await, dec(100_000));

    let err = funding::create_request(&db, d, s.id, dec(1)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));

    assert_eq!(accepted_total(&db, s.id).await, raised(&db, s.id).await);
}

#[tokio::test]
async fn creation_boundaries() {
    let db = test_db().await;
    let f = founder(&db, "founder").await;
    let s = listed_startup(&db, f, "Acme", 1_000).await;
    let i = investor(&db, "inv").await;

    assert!(matches!(
        funding::create_request(&db, i, s.id, Decimal::ZERO).await,
        Err(AppError::InvalidRequest(_))
    ));
    assert!(matches!(
        funding::create_request(&db, i, s.id, dec(-10)).await,
        Err(AppError::InvalidRequest(_))
    ));
    assert!(matches!(
        funding::create_request(&db, i, s.id, dec(1_001)).await,
        Err(AppError::InvalidRequest(_))
    ));
    assert!(matches!(
        funding::create_request(&db, i, 9_999, dec(10)).await,
        Err(AppError::InvalidRequest(_))
    ));

    // Exactly the remaining capacity is fine
    let full = funding::create_request(&db, i, s.id, dec(1_000)).await.unwrap();
    assert_eq!(full.amount, dec(1_000));
}

#[tokio::test]
async fn acceptance_rechecks_capacity() {
    let db = test_db().await;
    let f = founder(&db, "founder").await;
    let s = listed_startup(&db, f, "Acme", 100).await;
    let x = investor(&db, "x").await;
    let y = investor(&db, "y").await;

    // Both fit when created, not together
    let first = funding::create_request(&db, x, s.id, dec(70)).await.unwrap();
    let second = funding::create_request(&db, y, s.id, dec(50)).await.unwrap();

    funding::decide_request(&db, f, first.id, Decision::Accept).await.unwrap();
    let err = funding::decide_request(&db, f, second.id, Decision::Accept)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let stored = investment_request::Entity::find_by_id(second.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, RequestStatus::Pending);
    assert_eq!(raised(&db, s.id).await, dec(70));

    // The founder can still turn it down
    let rejected = funding::decide_request(&db, f, second.id, Decision::Reject)
        .await
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
}

#[tokio::test]
async fn rejection_never_moves_funding() {
    let db = test_db().await;
    let f = founder(&db, "founder").await;
    let s = listed_startup(&db, f, "Acme", 500).await;
    let i = investor(&db, "inv").await;

    let req = funding::create_request(&db, i, s.id, dec(200)).await.unwrap();
    let decided = funding::decide_request(&db, f, req.id, Decision::Reject).await.unwrap();
    assert_eq!(decided.status, RequestStatus::Rejected);
    assert_eq!(raised(&db, s.id).await, Decimal::ZERO);
}

#[tokio::test]
async fn decided_requests_are_terminal() {
    let db = test_db().await;
    let f = founder(&db, "founder").await;
    let s = listed_startup(&db, f, "Acme", 500).await;
    let i = investor(&db, "inv").await;

    let req = funding::create_request(&db, i, s.id, dec(100)).await.unwrap();
    funding::decide_request(&db, f, req.id, Decision::Accept).await.unwrap();

    // A second accept must not count the amount twice
    assert!(matches!(
        funding::decide_request(&db, f, req.id, Decision::Accept).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        funding::decide_request(&db, f, req.id, Decision::Reject).await,
        Err(AppError::Conflict(_))
    ));
    assert_eq!(raised(&db, s.id).await, dec(100));

    let rejected = funding::create_request(&db, i, s.id, dec(50)).await.unwrap();
    funding::decide_request(&db, f, rejected.id, Decision::Reject).await.unwrap();
    assert!(matches!(
        funding::decide_request(&db, f, rejected.id, Decision::Accept).await,
        Err(AppError::Conflict(_))
    ));
    assert_eq!(raised(&db, s.id).await, dec(100));
}

#[tokio::test]
async fn only_the_owning_founder_decides() {
    let db = test_db().await;
    let owner = founder(&db, "owner").await;
    let other = founder(&db, "other").await;
    let s = listed_startup(&db, owner, "Acme", 500).await;
    let i = investor(&db, "inv").await;

    let req = funding::create_request(&db, i, s.id, dec(100)).await.unwrap();
    assert!(matches!(
        funding::decide_request(&db, other, req.id, Decision::Accept).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        funding::decide_request(&db, owner, 12_345, Decision::Accept).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(raised(&db, s.id).await, Decimal::ZERO);
}

#[tokio::test]
async fn concurrent_acceptances_cannot_overspend() {
    let db = test_db().await;
    let f = founder(&db, "founder").await;
    let s = listed_startup(&db, f, "Acme", 100).await;
    let x = investor(&db, "x").await;
    let y = investor(&db, "y").await;

    let rx = funding::create_request(&db, x, s.id, dec(60)).await.unwrap();
    let ry = funding::create_request(&db, y, s.id, dec(60)).await.unwrap();

    let (db1, db2) = (db.clone(), db.clone());
    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { funding::decide_request(&db1, f, rx.id, Decision::Accept).await }),
        tokio::spawn(async move { funding::decide_request(&db2, f, ry.id, Decision::Accept).await }),
    );
    let outcomes = [r1.unwrap(), r2.unwrap()];

    let wins = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(AppError::Conflict(_)))));

    assert_eq!(raised(&db, s.id).await, dec(60));
    assert_eq!(accepted_total(&db, s.id).await, dec(60));
}

#[tokio::test]
async fn accepted_requests_always_sum_to_amount_raised() {
    let db = test_db().await;
    let f = founder(&db, "founder").await;
    let s = listed_startup(&db, f, "Acme", 1_000).await;
    let t = listed_startup(&db, f, "Beta", 300).await;
    let i = investor(&db, "inv").await;

    // (startup, amount, decision)
    let steps = [
        (s.id, 250, Decision::Accept),
        (t.id, 100, Decision::Reject),
        (s.id, 400, Decision::Reject),
        (t.id, 300, Decision::Accept),
        (s.id, 500, Decision::Accept),
        (s.id, 250, Decision::Accept),
        (s.id, 1, Decision::Accept),
    ];

    for (startup_id, amount, decision) in steps {
        let Ok(req) = funding::create_request(&db, i, startup_id, dec(amount)).await else {
            continue;
        };
        let _ = funding::decide_request(&db, f, req.id, decision).await;

        for id in [s.id, t.id] {
            assert_eq!(accepted_total(&db, id).await, raised(&db, id).await);
        }
    }

    assert_eq!(raised(&db, s.id).await, dec(1_000));
    assert_eq!(raised(&db, t.id).await, dec(300));
}

#[tokio::test]
async fn listings_are_scoped_and_newest_first() {
    let db = test_db().await;
    let f1 = founder(&db, "f1").await;
    let f2 = founder(&db, "f2").await;
    let s1 = listed_startup(&db, f1, "One", 1_000).await;
    let s2 = listed_startup(&db, f2, "Two", 1_000).await;
    let i = investor(&db, "inv").await;
    let j = investor(&db, "jay").await;

    let r1 = funding::create_request(&db, i, s1.id, dec(10)).await.unwrap();
    let r2 = funding::create_request(&db, i, s2.id, dec(20)).await.unwrap();
    let r3 = funding::create_request(&db, j, s1.id, dec(30)).await.unwrap();

    let mine: Vec<i32> = funding::list_investor_requests(&db, i)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.request.id)
        .collect();
    assert_eq!(mine, vec![r2.id, r1.id]);

    let incoming = funding::list_founder_requests(&db, f1, None).await.unwrap();
    let ids: Vec<i32> = incoming.iter().map(|r| r.request.id).collect();
    assert_eq!(ids, vec![r3.id, r1.id]);
    assert!(incoming.iter().all(|r| r.startup.id == s1.id));
    assert_eq!(incoming[0].investor.username, "jay");

    funding::decide_request(&db, f1, r1.id, Decision::Accept).await.unwrap();
    let pending = funding::list_founder_requests(&db, f1, Some(RequestStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].request.id, r3.id);

    let investments = funding::list_investments(&db, i).await.unwrap();
    assert_eq!(investments.len(), 1);
    assert_eq!(investments[0].request.id, r1.id);
    assert!(funding::list_investments(&db, j).await.unwrap().is_empty());
}

#[tokio::test]
async fn saved_startups_are_unique_per_investor() {
    let db = test_db().await;
    let f = founder(&db, "founder").await;
    let s1 = listed_startup(&db, f, "One", 1_000).await;
    let s2 = listed_startup(&db, f, "Two", 1_000).await;
    let i = investor(&db, "inv").await;

    let (_, outcome) = funding::save_startup(&db, i, s1.id).await.unwrap();
    assert_eq!(outcome, funding::SaveOutcome::Created);
    let (_, outcome) = funding::save_startup(&db, i, s1.id).await.unwrap();
    assert_eq!(outcome, funding::SaveOutcome::AlreadySaved);
    funding::save_startup(&db, i, s2.id).await.unwrap();

    let saved: Vec<i32> = funding::list_saved(&db, i).await.unwrap().iter().map(|s| s.id).collect();
    assert_eq!(saved, vec![s2.id, s1.id]);

    funding::unsave_startup(&db, i, s1.id).await.unwrap();
    assert!(matches!(
        funding::unsave_startup(&db, i, s1.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        funding::save_startup(&db, i, 4_242).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn startup_updates_respect_ownership_and_raised_total() {
    let db = test_db().await;
    let owner = founder(&db, "owner").await;
    let other = founder(&db, "other").await;
    let s = listed_startup(&db, owner, "Acme", 1_000).await;
    let i = investor(&db, "inv").await;

    let req = funding::create_request(&db, i, s.id, dec(600)).await.unwrap();
    funding::decide_request(&db, owner, req.id, Decision::Accept).await.unwrap();

    let lowered = funding::StartupChanges {
        funding_goal: Some(dec(500)),
        ..Default::default()
    };
    assert!(matches!(
        funding::update_startup(&db, owner, s.id, lowered).await,
        Err(AppError::InvalidRequest(_))
    ));

    let renamed = funding::StartupChanges {
        name: Some("Acme Labs".to_string()),
        equity: Some(Some(dec(20))),
        ..Default::default()
    };
    assert!(matches!(
        funding::update_startup(&db, other, s.id, renamed.clone()).await,
        Err(AppError::NotFound(_))
    ));
    let updated = funding::update_startup(&db, owner, s.id, renamed).await.unwrap();
    assert_eq!(updated.name, "Acme Labs");
    assert_eq!(updated.amount_raised, dec(600));
    assert_eq!(updated.valuation(), Some(dec(5_000)));

    let cleared = funding::StartupChanges {
        equity: Some(None),
        ..Default::default()
    };
    let updated = funding::update_startup(&db, owner, s.id, cleared).await.unwrap();
    assert_eq!(updated.equity, None);
    assert_eq!(updated.valuation(), None);
    assert_eq!(updated.name, "Acme Labs");

    // Nothing to change is a no-op
    let same = funding::update_startup(&db, owner, s.id, funding::StartupChanges::default())
        .await
        .unwrap();
    assert_eq!(same, updated);
}

#[tokio::test]
async fn money_must_fit_two_decimal_places_and_twelve_digits() {
    let db = test_db().await;
    let f = founder(&db, "founder").await;
    let s = listed_startup(&db, f, "Acme", 100).await;
    let i = investor(&db, "inv").await;

    let err = funding::create_request(&db, i, s.id, Decimal::new(4, 3)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));
    assert!(matches!(
        funding::create_request(&db, i, s.id, Decimal::new(10_005, 3)).await,
        Err(AppError::InvalidRequest(_))
    ));
    let cents = funding::create_request(&db, i, s.id, Decimal::new(1_050, 2)).await.unwrap();
    assert_eq!(cents.amount, Decimal::new(1_050, 2));

    let huge = funding::NewStartup {
        name: "Huge".to_string(),
        funding_goal: Decimal::from(1_000_000_000_000_000_i64),
        ..Default::default()
    };
    assert!(matches!(
        funding::create_startup(&db, f, huge).await,
        Err(AppError::InvalidRequest(_))
    ));
    let widest = funding::NewStartup {
        name: "Widest".to_string(),
        funding_goal: Decimal::new(999_999_999_999, 2),
        ..Default::default()
    };
    let widest = funding::create_startup(&db, f, widest).await.unwrap();
    assert_eq!(widest.funding_goal, Decimal::new(999_999_999_999, 2));

    let raised_too_far = funding::StartupChanges {
        funding_goal: Some(Decimal::from(10_000_000_000_i64)),
        ..Default::default()
    };
    assert!(matches!(
        funding::update_startup(&db, f, s.id, raised_too_far).await,
        Err(AppError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn single_request_record_nests_startup_and_investor() {
    let db = test_db().await;
    let f = founder(&db, "founder").await;
    let s = listed_startup(&db, f, "Acme", 1_000).await;
    let i = investor(&db, "inv").await;
    let req = funding::create_request(&db, i, s.id, dec(250)).await.unwrap();

    let record = funding::get_request_record(&db, req.id).await.unwrap();
    assert_eq!(record.request.id, req.id);
    assert_eq!(record.startup.id, s.id);
    assert_eq!(record.investor.username, "inv");

    assert!(matches!(
        funding::get_request_record(&db, 9_999).await,
        Err(AppError::NotFound(_))
    ));
}
