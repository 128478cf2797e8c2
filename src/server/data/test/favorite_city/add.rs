use super::*;

/// Tests adding a new favorite.
///
/// Expected: Added with a single entry
#[tokio::test]
async fn adds_new_city() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let repo = FavoriteCityRepository::new(db);

    let outcome = repo.add(user.id, hanoi()).await?;

    match outcome {
        AddFavoriteOutcome::Added(favorites) => {
            assert_eq!(favorites.len(), 1);
            assert_eq!(favorites[0].name, "Hanoi");
            assert_eq!(favorites[0].country, "VN");
        }
        other => panic!("expected Added, got {other:?}"),
    }

    Ok(())
}

/// Tests adding the same `(name, country)` pair twice.
///
/// Verifies that the second add is a no-op that reports the existing list.
///
/// Expected: AlreadyPresent with one entry
#[tokio::test]
async fn is_idempotent_on_name_and_country() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let repo = FavoriteCityRepository::new(db);

    repo.add(user.id, hanoi()).await?;
    let outcome = repo.add(user.id, hanoi()).await?;

    match outcome {
        AddFavoriteOutcome::AlreadyPresent(favorites) => assert_eq!(favorites.len(), 1),
        other => panic!("expected AlreadyPresent, got {other:?}"),
    }

    Ok(())
}

/// Tests that favorites are scoped per user.
///
/// Expected: the same city can be added by two users
#[tokio::test]
async fn scopes_favorites_per_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::create_user(db).await?;
    let bob = factory::create_user(db).await?;
    let repo = FavoriteCityRepository::new(db);

    repo.add(alice.id, hanoi()).await?;
    let outcome = repo.add(bob.id, hanoi()).await?;

    assert!(matches!(outcome, AddFavoriteOutcome::Added(ref list) if list.len() == 1));
    assert_eq!(repo.get_by_user_id(alice.id).await?.len(), 1);

    Ok(())
}

/// Tests losing an add race to a concurrent insert of the same city.
///
/// Verifies that when the row appears after the lookup, the unique index
/// rejection is reported as AlreadyPresent rather than a database error.
///
/// Expected: AlreadyPresent with the single competing row
#[tokio::test]
async fn reports_concurrent_duplicate_as_present() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    factory::create_favorite(db, user.id, "Hanoi", "VN").await?;
    let repo = FavoriteCityRepository::new(db);

    let outcome = repo.insert_new(user.id, hanoi()).await?;

    match outcome {
        AddFavoriteOutcome::AlreadyPresent(favorites) => assert_eq!(favorites.len(), 1),
        other => panic!("expected AlreadyPresent, got {other:?}"),
    }

    Ok(())
}

/// Tests several simultaneous adds of the same city.
///
/// Expected: exactly one Added, the rest AlreadyPresent, one stored row
#[tokio::test]
async fn stores_one_row_for_simultaneous_adds() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let repo = FavoriteCityRepository::new(db);

    let (a, b, c) = tokio::join!(
        repo.add(user.id, hanoi()),
        repo.add(user.id, hanoi()),
        repo.add(user.id, hanoi())
    );
    let outcomes = [a?, b?, c?];

    let added = outcomes
        .iter()
        .filter(|o| matches!(o, AddFavoriteOutcome::Added(_)))
        .count();
    assert_eq!(added, 1);
    assert_eq!(repo.get_by_user_id(user.id).await?.len(), 1);

    Ok(())
}
