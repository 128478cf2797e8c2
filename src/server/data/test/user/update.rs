use super::*;

/// Tests partial preference updates.
///
/// Verifies that only the provided preference fields change.
///
/// Expected: temperature unit updated, language unchanged
#[tokio::test]
async fn updates_only_provided_preferences() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserFactory::new(db).build().await?;
    let repo = UserRepository::new(db);

    let updated = repo
        .update_preferences(user.id, Some("fahrenheit".to_string()), None)
        .await?
        .unwrap();

    assert_eq!(updated.preferences.temperature_unit, "fahrenheit");
    assert_eq!(updated.preferences.language, "en");

    Ok(())
}

/// Tests storing the last reported location.
///
/// Expected: last_location populated with the given values
#[tokio::test]
async fn stores_last_location() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserFactory::new(db).build().await?;
    let repo = UserRepository::new(db);

    let updated = repo
        .update_last_location(user.id, 10.82, 106.63, "Ho Chi Minh City".to_string(), "VN".to_string())
        .await?
        .unwrap();

    let location = updated.last_location.unwrap();
    assert_eq!(location.city, "Ho Chi Minh City");
    assert_eq!(location.country, "VN");
    assert_eq!(location.lat, 10.82);
    assert_eq!(location.lon, 106.63);

    Ok(())
}

/// Tests admin edits and banning.
///
/// Verifies that admin updates apply the given fields and that the banned
/// flag toggles.
///
/// Expected: fields changed, banned true then false
#[tokio::test]
async fn applies_admin_update_and_ban() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserFactory::new(db).build().await?;
    let repo = UserRepository::new(db);

    let updated = repo
        .update(
            user.id,
            UpdateUserParam {
                full_name: Some("Nguyen Van A".to_string()),
                is_verified: Some(true),
                ..Default::default()
            },
        )
        .await?
        .unwrap();
    assert_eq!(updated.full_name.as_deref(), Some("Nguyen Van A"));
    assert!(updated.is_verified);
    assert_eq!(updated.email, user.email);

    let banned = repo.set_banned(user.id, true).await?.unwrap();
    assert!(banned.banned);
    let unbanned = repo.set_banned(user.id, false).await?.unwrap();
    assert!(!unbanned.banned);

    Ok(())
}

/// Tests updating a user that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let result = repo.set_banned(9999, true).await?;

    assert!(result.is_none());

    Ok(())
}
