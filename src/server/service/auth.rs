//! Account registration, login and token handling.
//!
//! Passwords are hashed with bcrypt on the blocking thread pool. Tokens are HS256
//! JWTs carrying the user ID and expire after seven days.

use chrono::{Duration, Utc};
use dioxus_logger::tracing;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config,
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    model::{
        auth::{cccd_digits, Claims, LoginParam, RegisterParam},
        user::{CreateUserParam, User},
    },
    service::webhook::notify_banned_login,
};

const TOKEN_LIFETIME_DAYS: i64 = 7;
const BCRYPT_COST: u32 = 10;

/// Signs a token for `user_id`.
pub fn issue_token(user_id: i32, secret: &str) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        user_id,
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::TokenSigning)
}

/// Verifies a token's signature and expiry.
///
/// # Returns
/// - `Ok(Claims)` - Token is valid
/// - `Err(AuthError::TokenExpired)` - Signature valid but expired
/// - `Err(AuthError::InvalidToken)` - Any other decoding failure
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

async fn hash_password(password: String) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::InternalError(format!("Password hashing task failed: {e}")))?
        .map_err(AuthError::from)?;
    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::InternalError(format!("Password check task failed: {e}")))?
        .map_err(AuthError::from)?;
    Ok(matches)
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection, config: &'a Config) -> Self {
        Self { db, config }
    }

    /// Creates an account and signs a token for it.
    ///
    /// # Returns
    /// - `Ok((token, User))` - Account created
    /// - `Err(AppError::BadRequest)` - Email, username or CCCD already registered
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn register(&self, param: RegisterParam) -> Result<(String, User), AppError> {
        let user_repo = UserRepository::new(self.db);

        if user_repo
            .identity_taken(&param.email, &param.username, param.cccd.as_deref())
            .await?
        {
            return Err(AppError::BadRequest(
                "User with this email or username already exists".to_string(),
            ));
        }

        let password_hash = hash_password(param.password).await?;
        let user = user_repo
            .create(CreateUserParam {
                username: param.username,
                email: param.email,
                password_hash,
                cccd: param.cccd,
                full_name: param.full_name,
                date_of_birth: param.date_of_birth,
                gender: param.gender,
                address: param.address,
            })
            .await?;

        tracing::info!("Registered user {} ({})", user.id, user.username);

        let token = issue_token(user.id, &self.config.jwt_secret)?;
        Ok((token, user))
    }

    /// Checks email and password and signs a token.
    ///
    /// Banned accounts are refused after the password check, and an alert is sent
    /// to the moderation webhook in the background.
    pub async fn login(&self, param: LoginParam) -> Result<(String, User), AppError> {
        let user_repo = UserRepository::new(self.db);

        let Some(user) = user_repo.find_by_email(&param.email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(param.password, user.password_hash.clone()).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.finish_login(user)
    }

    /// Signs a token for the account registered with a CCCD number.
    pub async fn login_with_cccd(&self, so_cccd: &str) -> Result<(String, User), AppError> {
        let user_repo = UserRepository::new(self.db);

        let cccd = cccd_digits(so_cccd);
        if cccd.is_empty() {
            return Err(AppError::BadRequest("Invalid CCCD number".to_string()));
        }
        let Some(user) = user_repo.find_by_cccd(&cccd).await? else {
            return Err(AppError::NotFound("CCCD chưa được đăng ký".to_string()));
        };

        self.finish_login(user)
    }

    fn finish_login(&self, user: User) -> Result<(String, User), AppError> {
        if user.banned {
            if let Some(url) = self.config.discord_webhook_url.clone() {
                let banned = user.clone();
                tokio::spawn(async move {
                    notify_banned_login(&url, &banned).await;
                });
            } else {
                tracing::warn!("DISCORD_WEBHOOK_URL not set, skipping banned user notification");
            }
            return Err(AuthError::AccountBanned(user.id).into());
        }

        let token = issue_token(user.id, &self.config.jwt_secret)?;
        Ok((token, user))
    }

    /// Resolves a bearer token to its user.
    ///
    /// # Returns
    /// - `Ok(User)` - Token valid and user exists
    /// - `Err(AuthError::InvalidToken | TokenExpired)` - Token rejected
    /// - `Err(AuthError::UserNotInDatabase)` - User deleted since the token was issued
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = verify_token(token, &self.config.jwt_secret)?;

        let user_repo = UserRepository::new(self.db);
        let Some(user) = user_repo.find_by_id(claims.user_id).await? else {
            return Err(AuthError::UserNotInDatabase(claims.user_id).into());
        };

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_token_claims() {
        let token = issue_token(42, "secret").unwrap();
        let claims = verify_token(&token, "secret").unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = issue_token(42, "secret").unwrap();

        assert!(matches!(
            verify_token(&token, "other"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn reports_expired_tokens() {
        let claims = Claims {
            user_id: 1,
            iat: (Utc::now() - Duration::days(8)).timestamp(),
            exp: (Utc::now() - Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(
            verify_token(&token, "secret"),
            Err(AuthError::TokenExpired)
        ));
    }

    fn register_param(email: &str, username: &str) -> RegisterParam {
        RegisterParam {
            username: username.to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            cccd: None,
            full_name: None,
            date_of_birth: None,
            gender: None,
            address: None,
        }
    }

    /// Tests registering and then logging in.
    ///
    /// Verifies that the stored bcrypt hash accepts the original password and
    /// that the issued token resolves back to the user.
    ///
    /// Expected: login succeeds, wrong password is InvalidCredentials
    #[tokio::test]
    async fn registers_then_logs_in() -> Result<(), AppError> {
        let test = test_utils::builder::TestBuilder::new()
            .with_user_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let config = Config::test();
        let service = AuthService::new(db, &config);

        let (_, user) = service
            .register(register_param("carol@example.com", "carol"))
            .await?;
        assert_ne!(user.password_hash, "secret1");

        let (token, logged_in) = service
            .login(LoginParam {
                email: "carol@example.com".to_string(),
                password: "secret1".to_string(),
            })
            .await?;
        assert_eq!(logged_in.id, user.id);
        assert_eq!(service.authenticate(&token).await?.id, user.id);

        let wrong = service
            .login(LoginParam {
                email: "carol@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;
        assert!(matches!(
            wrong,
            Err(AppError::AuthErr(AuthError::InvalidCredentials))
        ));

        Ok(())
    }

    /// Tests registering a duplicate email or username.
    ///
    /// Expected: Err(AppError::BadRequest)
    #[tokio::test]
    async fn rejects_duplicate_registration() -> Result<(), AppError> {
        let test = test_utils::builder::TestBuilder::new()
            .with_user_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let config = Config::test();
        let service = AuthService::new(db, &config);

        service
            .register(register_param("dave@example.com", "dave"))
            .await?;

        let same_email = service
            .register(register_param("dave@example.com", "dave2"))
            .await;
        let same_username = service
            .register(register_param("dave2@example.com", "dave"))
            .await;

        assert!(matches!(same_email, Err(AppError::BadRequest(_))));
        assert!(matches!(same_username, Err(AppError::BadRequest(_))));

        Ok(())
    }

    /// Tests logging in to a banned account.
    ///
    /// Expected: Err(AuthError::AccountBanned)
    #[tokio::test]
    async fn refuses_banned_account() -> Result<(), AppError> {
        let test = test_utils::builder::TestBuilder::new()
            .with_user_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let user = test_utils::factory::user::UserFactory::new(db)
            .cccd("079201001234")
            .banned(true)
            .build()
            .await?;
        let config = Config::test();
        let service = AuthService::new(db, &config);

        let result = service.login_with_cccd("079201001234").await;

        assert!(matches!(
            result,
            Err(AppError::AuthErr(AuthError::AccountBanned(id))) if id == user.id
        ));

        Ok(())
    }

    /// Tests CCCD login for an unregistered number.
    ///
    /// Expected: Err(AppError::NotFound)
    #[tokio::test]
    async fn reports_unregistered_cccd() -> Result<(), AppError> {
        let test = test_utils::builder::TestBuilder::new()
            .with_user_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let config = Config::test();
        let service = AuthService::new(db, &config);

        let result = service.login_with_cccd("000000000000").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));

        Ok(())
    }

    /// Tests CCCD login with input that has no digits.
    ///
    /// Verifies that a number reducing to nothing never matches an account,
    /// even one whose stored CCCD is empty.
    ///
    /// Expected: Err(AppError::BadRequest)
    #[tokio::test]
    async fn refuses_cccd_without_digits() -> Result<(), AppError> {
        let test = test_utils::builder::TestBuilder::new()
            .with_user_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        test_utils::factory::user::UserFactory::new(db)
            .cccd("")
            .build()
            .await?;
        let config = Config::test();
        let service = AuthService::new(db, &config);

        let result = service.login_with_cccd("not-a-number").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));

        Ok(())
    }
}
