use crate::{
    client::{
        api::helper::{delete, fetch_json, get, post, put, serialize_json},
        model::error::ApiError,
    },
    model::{
        api::MessageDto,
        user::{
            AddFavoriteDto, AddSearchHistoryDto, FavoritesResponseDto, LastLocationResponseDto,
            PreferencesResponseDto, SearchHistoryResponseDto, UpdateLastLocationDto,
            UpdatePreferencesDto,
        },
    },
};

pub async fn get_favorites() -> Result<FavoritesResponseDto, ApiError> {
    fetch_json(|| get("/api/user/favorites")).await
}

pub async fn add_favorite(payload: &AddFavoriteDto) -> Result<FavoritesResponseDto, ApiError> {
    let body = serialize_json(payload)?;
    fetch_json(|| post("/api/user/favorites").body(body.clone())).await
}

pub async fn remove_favorite(id: i32) -> Result<FavoritesResponseDto, ApiError> {
    let url = format!("/api/user/favorites/{}", id);
    fetch_json(|| delete(&url)).await
}

pub async fn get_search_history() -> Result<SearchHistoryResponseDto, ApiError> {
    fetch_json(|| get("/api/user/search-history")).await
}

pub async fn add_search_history(
    payload: &AddSearchHistoryDto,
) -> Result<SearchHistoryResponseDto, ApiError> {
    let body = serialize_json(payload)?;
    fetch_json(|| post("/api/user/search-history").body(body.clone())).await
}

pub async fn clear_search_history() -> Result<MessageDto, ApiError> {
    fetch_json(|| delete("/api/user/search-history")).await
}

pub async fn update_preferences(
    payload: &UpdatePreferencesDto,
) -> Result<PreferencesResponseDto, ApiError> {
    let body = serialize_json(payload)?;
    fetch_json(|| put("/api/user/preferences").body(body.clone())).await
}

pub async fn update_last_location(
    payload: &UpdateLastLocationDto,
) -> Result<LastLocationResponseDto, ApiError> {
    let body = serialize_json(payload)?;
    fetch_json(|| put("/api/user/last-location").body(body.clone())).await
}
