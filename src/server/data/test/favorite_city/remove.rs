use super::*;

/// Tests removing a favorite.
///
/// Expected: remaining list excludes the removed city
#[tokio::test]
async fn removes_city() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let hanoi = factory::create_favorite(db, user.id, "Hanoi", "VN").await?;
    factory::create_favorite(db, user.id, "Hue", "VN").await?;

    let repo = FavoriteCityRepository::new(db);
    let remaining = repo.remove(user.id, hanoi.id).await?;

    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Hue");

    Ok(())
}

/// Tests removing another user's favorite.
///
/// Verifies that a user cannot delete favorites they do not own and that
/// unknown IDs are ignored.
///
/// Expected: owner's list unchanged
#[tokio::test]
async fn ignores_foreign_and_unknown_ids() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let favorite = factory::create_favorite(db, owner.id, "Hanoi", "VN").await?;

    let repo = FavoriteCityRepository::new(db);
    repo.remove(other.id, favorite.id).await?;
    repo.remove(owner.id, favorite.id + 100).await?;

    assert_eq!(repo.get_by_user_id(owner.id).await?.len(), 1);

    Ok(())
}
