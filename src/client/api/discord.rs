use crate::{
    client::{
        api::helper::{fetch_json, get, post, put, serialize_json},
        model::error::ApiError,
    },
    model::discord::{
        ConnectDiscordDto, DiscordLinkResponseDto, DiscordStatusResponseDto, SubscribeDto,
        UpdateCityDto,
    },
};

pub async fn get_status() -> Result<DiscordStatusResponseDto, ApiError> {
    fetch_json(|| get("/api/discord/status")).await
}

pub async fn connect(payload: &ConnectDiscordDto) -> Result<DiscordLinkResponseDto, ApiError> {
    let body = serialize_json(payload)?;
    fetch_json(|| post("/api/discord/connect").body(body.clone())).await
}

pub async fn subscribe(payload: &SubscribeDto) -> Result<DiscordLinkResponseDto, ApiError> {
    let body = serialize_json(payload)?;
    fetch_json(|| post("/api/discord/subscribe").body(body.clone())).await
}

pub async fn unsubscribe() -> Result<DiscordLinkResponseDto, ApiError> {
    fetch_json(|| post("/api/discord/unsubscribe")).await
}

pub async fn update_city(payload: &UpdateCityDto) -> Result<DiscordLinkResponseDto, ApiError> {
    let body = serialize_json(payload)?;
    fetch_json(|| put("/api/discord/update-city").body(body.clone())).await
}
