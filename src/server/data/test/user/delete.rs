use super::*;
use test_utils::factory::{create_favorite, create_search_entry};

/// Tests deleting an account with activity.
///
/// Verifies that the deleted user is returned and that favorites and search
/// history are removed with it.
///
/// Expected: Ok(Some(user)), child rows gone
#[tokio::test]
async fn deletes_user_and_child_rows() -> Result<(), DbErr> {
    use sea_orm::{EntityTrait, PaginatorTrait};

    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserFactory::new(db).email("gone@example.com").build().await?;
    create_favorite(db, user.id, "Hanoi", "VN").await?;
    create_search_entry(db, user.id, "Hue", "VN").await?;

    let repo = UserRepository::new(db);
    let deleted = repo.delete(user.id).await?;

    assert_eq!(deleted.map(|u| u.email), Some("gone@example.com".to_string()));
    assert!(repo.find_by_id(user.id).await?.is_none());
    assert_eq!(entity::prelude::FavoriteCity::find().count(db).await?, 0);
    assert_eq!(entity::prelude::SearchHistory::find().count(db).await?, 0);

    Ok(())
}

/// Tests deleting an unknown account.
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

    assert!(repo.delete(42).await?.is_none());

    Ok(())
}
