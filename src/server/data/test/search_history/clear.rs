use super::*;

/// Tests clearing a user's history.
///
/// Verifies that only the requesting user's entries are removed.
///
/// Expected: empty history for the user, other user untouched
#[tokio::test]
async fn clears_only_own_history() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    factory::create_search_entry(db, user.id, "Hanoi", "VN").await?;
    factory::create_search_entry(db, other.id, "Hue", "VN").await?;

    let repo = SearchHistoryRepository::new(db);
    repo.clear(user.id).await?;

    assert!(repo.get_by_user_id(user.id).await?.is_empty());
    assert_eq!(repo.get_by_user_id(other.id).await?.len(), 1);

    Ok(())
}
