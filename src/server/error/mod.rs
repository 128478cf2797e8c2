//! Error types and HTTP response handling.
//!
//! This module provides the application's error hierarchy and conversion logic for
//! transforming errors into appropriate HTTP responses. The `AppError` enum serves
//! as the top-level error type that wraps domain-specific errors and implements
//! `IntoResponse` for automatic error handling in API endpoints.

pub mod auth;
pub mod config;
pub mod ocr;
pub mod validation;
pub mod weather;

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        auth::AuthError, config::ConfigError, ocr::OcrError, validation::ValidationError,
        weather::WeatherError,
    },
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application and provides
/// automatic conversion to HTTP responses. Domain-specific errors like `AuthError` and
/// `ValidationError` handle their own response mapping, while generic variants provide
/// standard HTTP status codes.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Authentication or authorization error.
    ///
    /// Delegates to `AuthError::into_response()` (400, 401, 403).
    #[error(transparent)]
    AuthErr(#[from] AuthError),

    /// Request body or query failed validation.
    ///
    /// Results in 400 Bad Request with a per-field error list.
    #[error(transparent)]
    ValidationErr(#[from] ValidationError),

    /// Weather provider failure.
    ///
    /// Results in 500 Internal Server Error carrying the provider message.
    #[error(transparent)]
    WeatherErr(#[from] WeatherError),

    /// Weather provider failure during city search.
    ///
    /// Results in 500 with an `API_KEY_MISSING` or `SEARCH_FAILED` code so clients
    /// can tell configuration problems from transient ones.
    #[error("City search failed: {0}")]
    SearchErr(WeatherError),

    /// CCCD image extraction failure.
    #[error(transparent)]
    OcrErr(#[from] OcrError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Multipart upload could not be read.
    #[error(transparent)]
    MultipartErr(#[from] MultipartError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Resource not found error.
    ///
    /// Results in 404 Not Found with the provided error message.
    #[error("{0}")]
    NotFound(String),

    /// Invalid request error.
    ///
    /// Results in 400 Bad Request with the provided error message.
    #[error("{0}")]
    BadRequest(String),

    /// Endpoint exists but is intentionally disabled.
    ///
    /// Results in 501 Not Implemented with the provided error message.
    #[error("{0}")]
    NotImplemented(String),

    /// Internal server error with custom message.
    ///
    /// The provided message is logged but a generic message is returned to the client.
    #[error("{0}")]
    InternalError(String),
}

/// Boxes serenity errors to keep `AppError` small.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - `BadRequest`, `ValidationErr`, unreadable multipart, missing CCCD image
/// - 404 Not Found - `NotFound`
/// - 501 Not Implemented - `NotImplemented`
/// - 500 Internal Server Error - weather, OCR and infrastructure failures
/// - Variable - `AuthErr`, delegated to `AuthError::into_response()`
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::AuthErr(err) => err.into_response(),
            Self::ValidationErr(err) => err.into_response(),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, Json(ErrorDto::new(msg))).into_response(),
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorDto::new(msg))).into_response()
            }
            Self::NotImplemented(msg) => {
                (StatusCode::NOT_IMPLEMENTED, Json(ErrorDto::new(msg))).into_response()
            }
            Self::MultipartErr(err) => {
                (StatusCode::BAD_REQUEST, Json(ErrorDto::new(err.body_text()))).into_response()
            }
            Self::WeatherErr(err) => {
                tracing::error!("Weather API request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDto::new(err.to_string())),
                )
                    .into_response()
            }
            Self::SearchErr(err) => {
                tracing::error!("Search error: {}", err);
                let body = if err.is_api_key_error() {
                    ErrorDto::with_code(
                        "Weather API key is not configured. Please check server configuration.",
                        "API_KEY_MISSING",
                    )
                } else {
                    ErrorDto::with_code(err.to_string(), "SEARCH_FAILED")
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            Self::OcrErr(err @ (OcrError::MissingImage | OcrError::ImageTooLarge)) => {
                let msg = err.to_string();
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorDto::with_code(msg.clone(), msg)),
                )
                    .into_response()
            }
            Self::OcrErr(err) => {
                tracing::error!("CCCD extraction failed: {}", err);
                let msg = "Không thể trích xuất thông tin từ ảnh CCCD";
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDto::with_code(msg, msg)),
                )
                    .into_response()
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorDto::new("Internal server error")),
                )
                    .into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic message to the client to avoid leaking
/// implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto::new("Internal server error")),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that each error family maps to its documented status code.
    ///
    /// Expected: 400 for validation, 401 for token problems, 403 for bans,
    /// 404/501 for their variants, 500 for search failures
    #[test]
    fn maps_errors_to_status_codes() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (
                ValidationError { errors: vec![] }.into(),
                StatusCode::BAD_REQUEST,
            ),
            (AuthError::MissingToken.into(), StatusCode::UNAUTHORIZED),
            (AuthError::TokenExpired.into(), StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCredentials.into(), StatusCode::BAD_REQUEST),
            (AuthError::AccountBanned(1).into(), StatusCode::FORBIDDEN),
            (
                AuthError::AccessDenied(1, "test".to_string()).into(),
                StatusCode::FORBIDDEN,
            ),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::NotImplemented("x".into()), StatusCode::NOT_IMPLEMENTED),
            (
                AppError::SearchErr(WeatherError::ApiKeyMissing),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (OcrError::MissingImage.into(), StatusCode::BAD_REQUEST),
            (OcrError::ImageTooLarge.into(), StatusCode::BAD_REQUEST),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
