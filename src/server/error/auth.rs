use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No bearer token was supplied on a protected route.
    #[error("No token, authorization denied")]
    MissingToken,

    /// Token signature or structure is invalid.
    #[error("Invalid token")]
    InvalidToken,

    /// Token was valid but its expiry has passed.
    #[error("Token expired")]
    TokenExpired,

    /// Token decoded but the user it names no longer exists.
    #[error("User {0} from token not found")]
    UserNotInDatabase(i32),

    /// Unknown email or wrong password on login.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login or request by a user an admin has banned.
    #[error("User {0} is banned")]
    AccountBanned(i32),

    /// User lacks the permission required by the route.
    ///
    /// # Fields
    /// - User ID
    /// - Reason for denial, logged only
    #[error("User {0} denied access: {1}")]
    AccessDenied(i32, String),

    /// Failed to hash or verify a password.
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),

    /// Failed to sign a token.
    #[error("Failed to sign token: {0}")]
    TokenSigning(jsonwebtoken::errors::Error),
}

/// Converts authentication errors into HTTP responses.
///
/// Token problems map to 401 with the message clients already display. Banned
/// accounts and missing permissions map to 403. Denial reasons and hashing
/// failures are only logged.
///
/// # Returns
/// - 400 Bad Request - Invalid credentials
/// - 401 Unauthorized - Missing, invalid, expired or orphaned token
/// - 403 Forbidden - Banned account or missing admin permission
/// - 500 Internal Server Error - Hashing or signing failure
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "No token, authorization denied"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            Self::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            Self::UserNotInDatabase(_) => (StatusCode::UNAUTHORIZED, "Token is not valid"),
            Self::InvalidCredentials => (StatusCode::BAD_REQUEST, "Invalid credentials"),
            Self::AccountBanned(_) => (StatusCode::FORBIDDEN, "Account is banned"),
            Self::AccessDenied(_, _) => (StatusCode::FORBIDDEN, "Forbidden: admin only"),
            Self::Bcrypt(_) | Self::TokenSigning(_) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        if status != StatusCode::INTERNAL_SERVER_ERROR {
            tracing::debug!("{}", self);
        }

        (status, Json(ErrorDto::new(message))).into_response()
    }
}
