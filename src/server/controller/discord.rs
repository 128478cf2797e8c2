use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};

use crate::{
    model::{
        api::ErrorDto,
        discord::{
            ConnectDiscordDto, DiscordLinkResponseDto, DiscordStatusResponseDto, SubscribeDto,
            UpdateCityDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::discord::{ConnectDiscordParam, DiscordLink, SubscribeParam},
        service::discord::DiscordService,
        state::AppState,
    },
};

/// Tag for grouping Discord link endpoints in OpenAPI documentation
pub static DISCORD_TAG: &str = "discord";

fn link_response(message: &str, link: DiscordLink) -> Json<DiscordLinkResponseDto> {
    Json(DiscordLinkResponseDto {
        message: message.to_string(),
        discord: link.into_dto(),
    })
}

/// Link a Discord account and delivery channel.
///
/// Relinking replaces the previous link and turns notifications off.
///
/// # Access Control
/// - Authenticated user
///
/// # Arguments
/// - `state` - Application state containing the database connection
/// - `headers` - Request headers carrying the bearer token
/// - `payload` - Discord user id and channel id
///
/// # Returns
/// - `200 OK` - Stored link
/// - `400 Bad Request` - Missing ids
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    post,
    path = "/api/discord/connect",
    tag = DISCORD_TAG,
    request_body = ConnectDiscordDto,
    responses(
        (status = 200, description = "Discord account linked", body = DiscordLinkResponseDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn connect(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ConnectDiscordDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let param = ConnectDiscordParam::from_dto(payload)?;
    let link = DiscordService::new(&state.db).connect(&user, param).await?;

    Ok(link_response("Discord account connected successfully", link))
}

/// Subscribe to scheduled weather notifications.
///
/// # Access Control
/// - Authenticated user with a linked Discord account
///
/// # Returns
/// - `200 OK` - Subscription stored
/// - `400 Bad Request` - Validation failed or no Discord account linked
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    post,
    path = "/api/discord/subscribe",
    tag = DISCORD_TAG,
    request_body = SubscribeDto,
    responses(
        (status = 200, description = "Subscribed", body = DiscordLinkResponseDto),
        (status = 400, description = "Validation failed or not linked", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn subscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SubscribeDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let param = SubscribeParam::from_dto(payload)?;
    let link = DiscordService::new(&state.db).subscribe(&user, param).await?;

    Ok(link_response(
        "Successfully subscribed to Discord weather notifications",
        link,
    ))
}

/// Stop scheduled weather notifications.
///
/// # Access Control
/// - Authenticated user with a linked Discord account
///
/// # Returns
/// - `200 OK` - Subscription removed
/// - `400 Bad Request` - No Discord account linked
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    post,
    path = "/api/discord/unsubscribe",
    tag = DISCORD_TAG,
    responses(
        (status = 200, description = "Unsubscribed", body = DiscordLinkResponseDto),
        (status = 400, description = "Not linked", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let link = DiscordService::new(&state.db).unsubscribe(&user).await?;

    Ok(link_response(
        "Successfully unsubscribed from Discord weather notifications",
        link,
    ))
}

/// Get the caller's Discord link and subscription state.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `200 OK` - Link status
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    get,
    path = "/api/discord/status",
    tag = DISCORD_TAG,
    responses(
        (status = 200, description = "Discord link status", body = DiscordStatusResponseDto),
        (status = 401, description = "Not authenticated", body = ErrorDto)
    ),
)]
pub async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    Ok(Json(DiscordStatusResponseDto {
        discord: user.discord.into_status_dto(),
    }))
}

/// Change the notification city and, optionally, the delivery time.
///
/// # Access Control
/// - Authenticated user with an active subscription
///
/// # Returns
/// - `200 OK` - Updated link
/// - `400 Bad Request` - Validation failed, not linked or not subscribed
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    put,
    path = "/api/discord/update-city",
    tag = DISCORD_TAG,
    request_body = UpdateCityDto,
    responses(
        (status = 200, description = "Notification city updated", body = DiscordLinkResponseDto),
        (status = 400, description = "Validation failed or not subscribed", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_city(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateCityDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let param = SubscribeParam::from_update_dto(payload)?;
    let link = DiscordService::new(&state.db)
        .update_city(&user, param)
        .await?;

    Ok(link_response("Notification city updated successfully", link))
}
