use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::{ErrorDto, FieldErrorDto};

/// One or more request fields failed validation.
///
/// Collected by `Validator` so every failing field is reported at once rather
/// than only the first one.
#[derive(Error, Debug)]
#[error("Validation failed")]
pub struct ValidationError {
    pub errors: Vec<FieldErrorDto>,
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorDto {
                message: "Validation failed".to_string(),
                error: None,
                errors: Some(self.errors),
            }),
        )
            .into_response()
    }
}

/// Accumulates field errors while checking a request body.
///
/// # Example
///
/// ```rust,ignore
/// let mut v = Validator::new();
/// v.check(payload.email.contains('@'), "email", "Please provide a valid email");
/// v.finish()?;
/// ```
#[derive(Default)]
pub struct Validator {
    errors: Vec<FieldErrorDto>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` against `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldErrorDto {
                field: field.to_string(),
                message: message.to_string(),
            });
        }
        self
    }

    /// Returns `Err` carrying every recorded failure, or `Ok` when none were recorded.
    pub fn finish(&mut self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: std::mem::take(&mut self.errors),
            })
        }
    }
}
