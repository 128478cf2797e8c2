use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        auth::{AuthResponseDto, CccdLoginDto, LoginDto, MeResponseDto, RegisterDto},
    },
    server::{
        error::{validation::Validator, AppError},
        middleware::auth::AuthGuard,
        model::auth::{LoginParam, RegisterParam},
        service::auth::AuthService,
        state::AppState,
    },
};

/// Tag for grouping auth endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

/// Register a new account.
///
/// Accepts either a regular sign-up or the CCCD flow, where the username may be
/// omitted and is generated from the current time.
///
/// # Access Control
/// - Public
///
/// # Arguments
/// - `state` - Application state containing the database connection and config
/// - `payload` - Registration fields
///
/// # Returns
/// - `201 Created` - Account created, token issued
/// - `400 Bad Request` - Validation failure or email/username/CCCD already taken
/// - `500 Internal Server Error` - Database or hashing error
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = AuthResponseDto),
        (status = 400, description = "Invalid data or account already exists", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterDto>,
) -> Result<impl IntoResponse, AppError> {
    let param = RegisterParam::from_dto(payload)?;

    let (token, user) = AuthService::new(&state.db, &state.config)
        .register(param)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponseDto {
            message: "User registered successfully".to_string(),
            token,
            user: user.into_public_dto(&state.config.admin_emails),
        }),
    ))
}

/// Log in with email and password.
///
/// # Access Control
/// - Public
///
/// # Returns
/// - `200 OK` - Token issued
/// - `400 Bad Request` - Unknown email or wrong password
/// - `403 Forbidden` - Account is banned
/// - `500 Internal Server Error` - Database or hashing error
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = AuthResponseDto),
        (status = 400, description = "Invalid credentials", body = ErrorDto),
        (status = 403, description = "Account is banned", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, AppError> {
    let param = LoginParam::from_dto(payload)?;

    let (token, user) = AuthService::new(&state.db, &state.config)
        .login(param)
        .await?;

    Ok(Json(AuthResponseDto {
        message: "Login successful".to_string(),
        token,
        user: user.into_public_dto(&state.config.admin_emails),
    }))
}

/// Log in with a CCCD number read from the card.
///
/// # Access Control
/// - Public
///
/// # Returns
/// - `200 OK` - Token issued
/// - `400 Bad Request` - No CCCD number supplied
/// - `403 Forbidden` - Account is banned
/// - `404 Not Found` - No account registered with this number
#[utoipa::path(
    post,
    path = "/api/auth/login/cccd",
    tag = AUTH_TAG,
    request_body = CccdLoginDto,
    responses(
        (status = 200, description = "Logged in", body = AuthResponseDto),
        (status = 400, description = "Missing CCCD number", body = ErrorDto),
        (status = 403, description = "Account is banned", body = ErrorDto),
        (status = 404, description = "CCCD not registered", body = ErrorDto)
    ),
)]
pub async fn login_cccd(
    State(state): State<AppState>,
    Json(payload): Json<CccdLoginDto>,
) -> Result<impl IntoResponse, AppError> {
    Validator::new()
        .check(!payload.so_cccd.trim().is_empty(), "so_cccd", "so_cccd is required")
        .finish()?;

    let (token, user) = AuthService::new(&state.db, &state.config)
        .login_with_cccd(&payload.so_cccd)
        .await?;

    Ok(Json(AuthResponseDto {
        message: "Login successful".to_string(),
        token,
        user: user.into_public_dto(&state.config.admin_emails),
    }))
}

/// Get the currently authenticated user.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `200 OK` - Public profile of the token's user
/// - `401 Unauthorized` - Missing, invalid or expired token
/// - `403 Forbidden` - Account is banned
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = MeResponseDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Account is banned", body = ErrorDto)
    ),
)]
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    Ok(Json(MeResponseDto {
        user: user.into_public_dto(&state.config.admin_emails),
    }))
}
