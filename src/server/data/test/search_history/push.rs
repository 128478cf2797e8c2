use super::*;
use chrono::{Duration, Utc};

/// Tests that new searches go to the front.
///
/// Expected: most recent first
#[tokio::test]
async fn orders_most_recent_first() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    factory::create_search_entry_at(db, user.id, "Hue", "VN", Utc::now() - Duration::minutes(5))
        .await?;

    let repo = SearchHistoryRepository::new(db);
    let history = repo.push(user.id, "Hanoi".to_string(), "VN".to_string()).await?;

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].city, "Hanoi");
    assert_eq!(history[1].city, "Hue");

    Ok(())
}

/// Tests repeating an earlier search.
///
/// Verifies that the earlier entry is moved to the front instead of duplicated.
///
/// Expected: one entry per pair, repeated city first
#[tokio::test]
async fn moves_repeated_search_to_front() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let now = Utc::now();
    factory::create_search_entry_at(db, user.id, "Hanoi", "VN", now - Duration::minutes(10))
        .await?;
    factory::create_search_entry_at(db, user.id, "Hue", "VN", now - Duration::minutes(5)).await?;

    let repo = SearchHistoryRepository::new(db);
    let history = repo.push(user.id, "Hanoi".to_string(), "VN".to_string()).await?;

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].city, "Hanoi");
    assert_eq!(history[1].city, "Hue");

    Ok(())
}

/// Tests the history cap.
///
/// Verifies that the oldest entries are pruned once the limit is exceeded.
///
/// Expected: exactly the limit remains, oldest entry gone
#[tokio::test]
async fn caps_history_at_limit() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let start = Utc::now() - Duration::hours(1);
    for i in 0..SEARCH_HISTORY_LIMIT as i64 {
        factory::create_search_entry_at(
            db,
            user.id,
            &format!("City{i}"),
            "VN",
            start + Duration::minutes(i),
        )
        .await?;
    }

    let repo = SearchHistoryRepository::new(db);
    let history = repo.push(user.id, "Newest".to_string(), "VN".to_string()).await?;

    assert_eq!(history.len() as u64, SEARCH_HISTORY_LIMIT);
    assert_eq!(history[0].city, "Newest");
    assert!(history.iter().all(|entry| entry.city != "City0"));

    use sea_orm::{EntityTrait, PaginatorTrait};
    let stored = entity::prelude::SearchHistory::find().count(db).await?;
    assert_eq!(stored, SEARCH_HISTORY_LIMIT);

    Ok(())
}
