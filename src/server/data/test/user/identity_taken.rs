use super::*;

/// Tests identity checks against an existing account.
///
/// Verifies that a matching email, username or CCCD each count as taken,
/// while a fully distinct identity does not.
///
/// Expected: true for each collision, false for a new identity
#[tokio::test]
async fn detects_each_taken_identity() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db)
        .username("bob")
        .email("bob@example.com")
        .cccd("012345678901")
        .build()
        .await?;

    let repo = UserRepository::new(db);

    assert!(repo.identity_taken("bob@example.com", "other", None).await?);
    assert!(repo.identity_taken("other@example.com", "bob", None).await?);
    assert!(
        repo.identity_taken("other@example.com", "other", Some("012345678901"))
            .await?
    );
    assert!(
        !repo
            .identity_taken("other@example.com", "other", Some("111111111111"))
            .await?
    );

    Ok(())
}
