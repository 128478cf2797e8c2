use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        user::{
            AddFavoriteDto, AddSearchHistoryDto, FavoritesResponseDto, LastLocationResponseDto,
            PreferencesResponseDto, SearchHistoryResponseDto, UpdateLastLocationDto,
            UpdatePreferencesDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::{
            favorite::{AddFavoriteOutcome, AddFavoriteParam, FavoriteCity},
            search_history::{AddSearchParam, SearchEntry},
            user::{LastLocationParam, UpdatePreferencesParam},
        },
        service::user::UserService,
        state::AppState,
    },
};

/// Tag for grouping user data endpoints in OpenAPI documentation
pub static USER_TAG: &str = "user";

fn favorites_dto(message: Option<&str>, favorites: Vec<FavoriteCity>) -> FavoritesResponseDto {
    FavoritesResponseDto {
        message: message.map(str::to_string),
        favorites: favorites.into_iter().map(FavoriteCity::into_dto).collect(),
    }
}

fn history_dto(message: Option<&str>, history: Vec<SearchEntry>) -> SearchHistoryResponseDto {
    SearchHistoryResponseDto {
        message: message.map(str::to_string),
        search_history: history.into_iter().map(SearchEntry::into_dto).collect(),
    }
}

/// Get the user's favorite cities, oldest first.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `200 OK` - Favorite cities
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    get,
    path = "/api/user/favorites",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Favorite cities", body = FavoritesResponseDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_favorites(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let favorites = UserService::new(&state.db).get_favorites(user.id).await?;

    Ok(Json(favorites_dto(None, favorites)))
}

/// Add a city to favorites.
///
/// Adding a `(name, country)` pair that is already present returns the unchanged
/// list with the message `City already in favorites`.
///
/// # Access Control
/// - Authenticated user
///
/// # Arguments
/// - `state` - Application state containing the database connection
/// - `headers` - Request headers carrying the bearer token
/// - `payload` - City name, country and coordinates
///
/// # Returns
/// - `200 OK` - Updated favorites
/// - `400 Bad Request` - Missing name/country or non-numeric coordinates
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    post,
    path = "/api/user/favorites",
    tag = USER_TAG,
    request_body = AddFavoriteDto,
    responses(
        (status = 200, description = "Favorites after the add", body = FavoritesResponseDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AddFavoriteDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let param = AddFavoriteParam::from_dto(payload)?;

    let dto = match UserService::new(&state.db)
        .add_favorite(user.id, param)
        .await?
    {
        AddFavoriteOutcome::Added(favorites) => {
            favorites_dto(Some("City added to favorites"), favorites)
        }
        AddFavoriteOutcome::AlreadyPresent(favorites) => {
            favorites_dto(Some("City already in favorites"), favorites)
        }
    };

    Ok(Json(dto))
}

/// Remove a city from favorites. Unknown ids leave the list unchanged.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `200 OK` - Favorites after the removal
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    delete,
    path = "/api/user/favorites/{city_id}",
    tag = USER_TAG,
    params(
        ("city_id" = i32, Path, description = "Favorite id")
    ),
    responses(
        (status = 200, description = "Favorites after the removal", body = FavoritesResponseDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(city_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let service = UserService::new(&state.db);
    let favorites = match city_id.parse::<i32>() {
        Ok(id) => service.remove_favorite(user.id, id).await?,
        Err(_) => service.get_favorites(user.id).await?,
    };

    Ok(Json(favorites_dto(
        Some("City removed from favorites"),
        favorites,
    )))
}

/// Get the user's recent searches, most recent first.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `200 OK` - Up to 20 searches
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    get,
    path = "/api/user/search-history",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Search history", body = SearchHistoryResponseDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_search_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let history = UserService::new(&state.db)
        .get_search_history(user.id)
        .await?;

    Ok(Json(history_dto(None, history)))
}

/// Record a search, moving an existing `(city, country)` entry to the front.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `200 OK` - Updated history, capped at 20 entries
/// - `400 Bad Request` - Missing city or country
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    post,
    path = "/api/user/search-history",
    tag = USER_TAG,
    request_body = AddSearchHistoryDto,
    responses(
        (status = 200, description = "Updated search history", body = SearchHistoryResponseDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_search_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AddSearchHistoryDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let param = AddSearchParam::from_dto(payload)?;
    let history = UserService::new(&state.db)
        .add_search(user.id, param)
        .await?;

    Ok(Json(history_dto(Some("Search added to history"), history)))
}

/// Clear the user's search history.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `200 OK` - History cleared
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    delete,
    path = "/api/user/search-history",
    tag = USER_TAG,
    responses(
        (status = 200, description = "History cleared", body = MessageDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn clear_search_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    UserService::new(&state.db)
        .clear_search_history(user.id)
        .await?;

    Ok(Json(MessageDto {
        message: "Search history cleared".to_string(),
    }))
}

/// Update display preferences.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `200 OK` - Stored preferences
/// - `400 Bad Request` - Unknown temperature unit or malformed language code
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    put,
    path = "/api/user/preferences",
    tag = USER_TAG,
    request_body = UpdatePreferencesDto,
    responses(
        (status = 200, description = "Preferences updated", body = PreferencesResponseDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_preferences(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdatePreferencesDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let param = UpdatePreferencesParam::from_dto(payload)?;
    let user = UserService::new(&state.db)
        .update_preferences(user.id, param)
        .await?;

    Ok(Json(PreferencesResponseDto {
        message: "Preferences updated".to_string(),
        preferences: user.preferences.into_dto(),
    }))
}

/// Store the user's last known location.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `200 OK` - Stored location with its update time
/// - `400 Bad Request` - Non-numeric coordinates or missing city/country
/// - `401 Unauthorized` - Not authenticated
#[utoipa::path(
    put,
    path = "/api/user/last-location",
    tag = USER_TAG,
    request_body = UpdateLastLocationDto,
    responses(
        (status = 200, description = "Last location updated", body = LastLocationResponseDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_last_location(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateLastLocationDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let param = LastLocationParam::from_dto(payload)?;
    let user = UserService::new(&state.db)
        .update_last_location(user.id, param)
        .await?;

    let last_location = user.last_location.ok_or_else(|| {
        AppError::InternalError(format!("User {} last location was not stored", user.id))
    })?;

    Ok(Json(LastLocationResponseDto {
        message: "Last location updated".to_string(),
        last_location: last_location.into_dto(),
    }))
}
