use super::*;
use chrono::Utc;

/// Tests selecting users for notification delivery.
///
/// Verifies that only subscribed users with a channel and a city are returned.
///
/// Expected: only the fully configured subscriber
#[tokio::test]
async fn returns_only_deliverable_subscribers() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscriber = UserFactory::new(db)
        .discord("1", "10")
        .subscribed("Hanoi", None)
        .build()
        .await?;
    UserFactory::new(db).discord("2", "20").build().await?;
    UserFactory::new(db).build().await?;

    let repo = UserRepository::new(db);
    let users = repo.get_subscribed().await?;

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, subscriber.id);

    Ok(())
}

/// Tests stamping a delivery.
///
/// Expected: last_notification set to the given instant
#[tokio::test]
async fn marks_user_notified() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserFactory::new(db)
        .discord("1", "10")
        .subscribed("Hanoi", None)
        .build()
        .await?;
    let repo = UserRepository::new(db);

    let at = Utc::now();
    repo.mark_notified(user.id, at).await?;

    let stored = repo.find_by_id(user.id).await?.unwrap();
    let last = stored.discord.last_notification.unwrap();
    assert_eq!(last.timestamp(), at.timestamp());

    Ok(())
}
