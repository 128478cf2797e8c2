use axum::http::{header::AUTHORIZATION, HeaderMap};
use test_utils::{builder::TestBuilder, factory::user::UserFactory};

use crate::server::{
    config::Config,
    error::{auth::AuthError, AppError},
    middleware::auth::{AuthGuard, Permission},
    service::auth::issue_token,
};

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    headers
}

/// Tests a valid token resolving to its user.
///
/// Verifies that the guard decodes the bearer token and loads the account.
///
/// Expected: Ok(User) with the token's user id
#[tokio::test]
async fn resolves_token_to_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = Config::test();

    let user = UserFactory::new(db).username("alice").build().await?;
    let headers = bearer(&issue_token(user.id, &config.jwt_secret)?);

    let result = AuthGuard::new(db, &config, &headers).require(&[]).await?;

    assert_eq!(result.id, user.id);
    assert_eq!(result.username, "alice");

    Ok(())
}

/// Tests a request without an Authorization header.
///
/// Expected: Err(AuthError::MissingToken)
#[tokio::test]
async fn rejects_missing_token() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = Config::test();
    let headers = HeaderMap::new();

    let result = AuthGuard::new(db, &config, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::MissingToken))
    ));

    Ok(())
}

/// Tests a token signed with another secret.
///
/// Expected: Err(AuthError::InvalidToken)
#[tokio::test]
async fn rejects_foreign_token() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = Config::test();

    let user = UserFactory::new(db).build().await?;
    let headers = bearer(&issue_token(user.id, "another-secret")?);

    let result = AuthGuard::new(db, &config, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidToken))
    ));

    Ok(())
}

/// Tests a token whose user was deleted after it was issued.
///
/// Expected: Err(AuthError::UserNotInDatabase)
#[tokio::test]
async fn rejects_token_for_missing_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = Config::test();
    let headers = bearer(&issue_token(9999, &config.jwt_secret)?);

    let result = AuthGuard::new(db, &config, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(9999)))
    ));

    Ok(())
}

/// Tests that banned users are refused on authenticated routes.
///
/// Expected: Err(AuthError::AccountBanned)
#[tokio::test]
async fn rejects_banned_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = Config::test();

    let user = UserFactory::new(db).banned(true).build().await?;
    let headers = bearer(&issue_token(user.id, &config.jwt_secret)?);

    let result = AuthGuard::new(db, &config, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccountBanned(id))) if id == user.id
    ));

    Ok(())
}

/// Tests admin access through the stored role and through the email allow-list.
///
/// Verifies that both a role `admin` account and a plain account listed in
/// `ADMIN_EMAILS` pass the admin check, while other users are denied.
///
/// Expected: Ok for both admins, Err(AuthError::AccessDenied) otherwise
#[tokio::test]
async fn checks_admin_permission() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let config = Config::test();

    let by_role = UserFactory::new(db).admin(true).build().await?;
    let by_email = UserFactory::new(db)
        .email("Admin@Example.com")
        .build()
        .await?;
    let regular = UserFactory::new(db).build().await?;

    for user in [&by_role, &by_email] {
        let headers = bearer(&issue_token(user.id, &config.jwt_secret)?);
        let result = AuthGuard::new(db, &config, &headers)
            .require(&[Permission::Admin])
            .await;
        assert!(result.is_ok(), "user {} should be admin", user.email);
    }

    let headers = bearer(&issue_token(regular.id, &config.jwt_secret)?);
    let result = AuthGuard::new(db, &config, &headers)
        .require(&[Permission::Admin])
        .await;

    match result {
        Err(AppError::AuthErr(AuthError::AccessDenied(id, reason))) => {
            assert_eq!(id, regular.id);
            assert!(reason.contains("admin"));
        }
        other => panic!("expected AccessDenied, got {:?}", other.map(|u| u.id)),
    }

    Ok(())
}
