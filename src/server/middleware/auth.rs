use axum::http::{header::AUTHORIZATION, HeaderMap};
use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config,
    error::{auth::AuthError, AppError},
    model::user::User,
    service::auth::AuthService,
};

pub enum Permission {
    Admin,
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// First characters of a token, safe to log.
pub fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(12) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}

pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
    headers: &'a HeaderMap,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, config: &'a Config, headers: &'a HeaderMap) -> Self {
        Self {
            db,
            config,
            headers,
        }
    }

    /// Resolves the bearer token to a user and checks `permissions`.
    ///
    /// # Returns
    /// - `Ok(User)` - Authenticated user holding every permission
    /// - `Err(AuthError::MissingToken)` - No bearer token
    /// - `Err(AuthError::InvalidToken | TokenExpired | UserNotInDatabase)` - Token rejected
    /// - `Err(AuthError::AccountBanned)` - User is banned
    /// - `Err(AuthError::AccessDenied)` - Missing a required permission
    pub async fn require(&self, permissions: &[Permission]) -> Result<User, AppError> {
        let Some(token) = bearer_token(self.headers) else {
            return Err(AuthError::MissingToken.into());
        };

        let user = AuthService::new(self.db, self.config)
            .authenticate(token)
            .await
            .inspect_err(|e| {
                tracing::debug!("Rejected token {}...: {}", token_prefix(token), e);
            })?;

        if user.banned {
            return Err(AuthError::AccountBanned(user.id).into());
        }

        for permission in permissions {
            match permission {
                Permission::Admin => {
                    if !user.is_admin(&self.config.admin_emails) {
                        return Err(AuthError::AccessDenied(
                            user.id,
                            "User attempted to access an admin route without the admin role"
                                .to_string(),
                        )
                        .into());
                    }
                }
            }
        }

        Ok(user)
    }
}
