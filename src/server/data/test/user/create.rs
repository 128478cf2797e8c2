use super::*;
use crate::server::model::user::Role;

/// Tests creating a new account.
///
/// Verifies that the repository stores the registration fields and applies
/// default role, preferences and an empty Discord link.
///
/// Expected: Ok with defaults applied
#[tokio::test]
async fn creates_user_with_defaults() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let user = repo.create(create_param("alice", "alice@example.com")).await?;

    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, Role::User);
    assert!(!user.banned);
    assert!(!user.is_verified);
    assert_eq!(user.preferences.temperature_unit, "celsius");
    assert_eq!(user.preferences.language, "en");
    assert!(user.last_location.is_none());
    assert!(!user.discord.is_connected());

    let found = repo.find_by_email("alice@example.com").await?;
    assert_eq!(found.map(|u| u.id), Some(user.id));

    Ok(())
}

/// Tests that a duplicate email is rejected by the database.
///
/// Verifies that the unique constraint on email surfaces as a database error.
///
/// Expected: Err
#[tokio::test]
async fn rejects_duplicate_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    repo.create(create_param("alice", "alice@example.com")).await?;

    let result = repo.create(create_param("alice2", "alice@example.com")).await;

    assert!(result.is_err());

    Ok(())
}

/// Tests looking up an account by CCCD number.
///
/// Expected: Ok(Some) for a registered number, Ok(None) otherwise
#[tokio::test]
async fn finds_user_by_cccd() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserFactory::new(db).cccd("001203004567").build().await?;

    let repo = UserRepository::new(db);

    let found = repo.find_by_cccd("001203004567").await?;
    assert_eq!(found.map(|u| u.id), Some(user.id));

    let missing = repo.find_by_cccd("999999999999").await?;
    assert!(missing.is_none());

    Ok(())
}
