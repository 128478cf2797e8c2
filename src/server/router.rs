//! REST routes, middleware layers and the OpenAPI document.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    model::{admin, api, auth, cccd, discord, user, weather},
    server::{
        controller::{
            admin::{
                ban_user, delete_user, get_audit_log, get_metrics, get_stats, get_user,
                get_user_analytics, list_users, update_user, ADMIN_TAG,
            },
            auth::{login, login_cccd, me, register, AUTH_TAG},
            cccd::{self as cccd_controller, CCCD_TAG, MAX_UPLOAD_BYTES},
            discord::{connect, status, subscribe, unsubscribe, update_city, DISCORD_TAG},
            user::{
                add_favorite, add_search_history, clear_search_history, get_favorites,
                get_search_history, remove_favorite, update_last_location, update_preferences,
                USER_TAG,
            },
            weather::{
                get_current, get_forecast, get_geolocation, get_historical, search, WEATHER_TAG,
            },
        },
        middleware::metrics::record_api_event,
        state::AppState,
    },
};

/// Adds the bearer JWT security scheme to the generated document.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token from POST /api/auth/login"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAuth),
    info(
        title = "Weather App API",
        description = "Weather lookups, saved cities, Discord notifications and moderation."
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::server::controller::auth::register,
        crate::server::controller::auth::login,
        crate::server::controller::auth::login_cccd,
        crate::server::controller::auth::me,
        crate::server::controller::weather::get_current,
        crate::server::controller::weather::get_forecast,
        crate::server::controller::weather::get_historical,
        crate::server::controller::weather::search,
        crate::server::controller::weather::get_geolocation,
        crate::server::controller::user::get_favorites,
        crate::server::controller::user::add_favorite,
        crate::server::controller::user::remove_favorite,
        crate::server::controller::user::get_search_history,
        crate::server::controller::user::add_search_history,
        crate::server::controller::user::clear_search_history,
        crate::server::controller::user::update_preferences,
        crate::server::controller::user::update_last_location,
        crate::server::controller::discord::connect,
        crate::server::controller::discord::subscribe,
        crate::server::controller::discord::unsubscribe,
        crate::server::controller::discord::status,
        crate::server::controller::discord::update_city,
        crate::server::controller::admin::get_stats,
        crate::server::controller::admin::get_metrics,
        crate::server::controller::admin::list_users,
        crate::server::controller::admin::get_user,
        crate::server::controller::admin::update_user,
        crate::server::controller::admin::ban_user,
        crate::server::controller::admin::delete_user,
        crate::server::controller::admin::get_audit_log,
        crate::server::controller::admin::get_user_analytics,
        crate::server::controller::cccd::register,
    ),
    components(schemas(
        api::ErrorDto,
        api::FieldErrorDto,
        api::MessageDto,
        auth::RegisterDto,
        auth::LoginDto,
        auth::CccdLoginDto,
        auth::AuthResponseDto,
        auth::MeResponseDto,
        user::PublicUserDto,
        user::PreferencesDto,
        user::LastLocationDto,
        user::FavoriteCityDto,
        user::SearchHistoryEntryDto,
        user::AddFavoriteDto,
        user::AddSearchHistoryDto,
        user::UpdatePreferencesDto,
        user::UpdateLastLocationDto,
        user::FavoritesResponseDto,
        user::SearchHistoryResponseDto,
        user::PreferencesResponseDto,
        user::LastLocationResponseDto,
        weather::LocationDto,
        weather::CurrentWeatherResponseDto,
        weather::ForecastResponseDto,
        weather::GeolocationWeatherDto,
        weather::CitySearchResponseDto,
        discord::ConnectDiscordDto,
        discord::SubscribeDto,
        discord::UpdateCityDto,
        discord::DiscordLinkResponseDto,
        discord::DiscordStatusResponseDto,
        admin::AdminStatsDto,
        admin::MetricsResponseDto,
        admin::UserListDto,
        admin::AdminUserDetailDto,
        admin::AdminUserResponseDto,
        admin::UpdateUserDto,
        admin::BanUserDto,
        admin::AuditListDto,
        admin::UserAnalyticsDto,
        cccd::CccdExtractResponseDto,
    )),
    tags(
        (name = AUTH_TAG, description = "Registration, login and the current user"),
        (name = WEATHER_TAG, description = "OpenWeatherMap lookups"),
        (name = USER_TAG, description = "Favorites, search history and preferences"),
        (name = DISCORD_TAG, description = "Discord link and notification subscription"),
        (name = ADMIN_TAG, description = "Moderation and usage statistics"),
        (name = CCCD_TAG, description = "CCCD card extraction"),
    )
)]
pub struct ApiDoc;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/login/cccd", post(login_cccd))
        .route("/api/auth/me", get(me))
        .route("/api/weather/current", get(get_current))
        .route("/api/weather/forecast", get(get_forecast))
        .route("/api/weather/historical", get(get_historical))
        .route("/api/weather/search", get(search))
        .route("/api/weather/geolocation", get(get_geolocation))
        .route("/api/user/favorites", get(get_favorites).post(add_favorite))
        .route("/api/user/favorites/{city_id}", delete(remove_favorite))
        .route(
            "/api/user/search-history",
            get(get_search_history)
                .post(add_search_history)
                .delete(clear_search_history),
        )
        .route("/api/user/preferences", put(update_preferences))
        .route("/api/user/last-location", put(update_last_location))
        .route("/api/discord/connect", post(connect))
        .route("/api/discord/subscribe", post(subscribe))
        .route("/api/discord/unsubscribe", post(unsubscribe))
        .route("/api/discord/status", get(status))
        .route("/api/discord/update-city", put(update_city))
        .route("/api/admin/stats", get(get_stats))
        .route("/api/admin/metrics", get(get_metrics))
        .route("/api/admin/users", get(list_users))
        .route(
            "/api/admin/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/admin/users/{id}/ban", post(ban_user))
        .route("/api/admin/audit", get(get_audit_log))
        .route(
            "/api/admin/user-analytics/{user_id}",
            get(get_user_analytics),
        )
        .route(
            "/api/cccd/register",
            post(cccd_controller::register).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

/// Builds the API router with usage telemetry, CORS and Swagger UI at `/api/docs`.
pub fn router(state: AppState) -> Router {
    api_routes()
        .layer(middleware::from_fn_with_state(state.clone(), record_api_event))
        .with_state(state)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::{header::CONTENT_TYPE, StatusCode};
    use test_utils::builder::TestBuilder;

    use super::*;
    use crate::server::{
        config::Config,
        controller::cccd::MAX_IMAGE_BYTES,
        service::weather::client::WeatherClient,
    };

    /// Multipart body carrying a `cccdImage` part of `len` bytes.
    fn card_upload(len: usize) -> (String, Vec<u8>) {
        let boundary = "cccd-upload-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"cccdImage\"; \
             filename=\"card.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .into_bytes();
        body.extend(vec![0xFF_u8; len]);
        body.extend(format!("\r\n--{boundary}--\r\n").into_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    async fn upload_status(base_url: &str, len: usize) -> StatusCode {
        let (content_type, body) = card_upload(len);
        reqwest::Client::new()
            .post(format!("{base_url}/api/cccd/register"))
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .unwrap()
            .status()
    }

    /// Tests the upload limit on the CCCD extraction route.
    ///
    /// Verifies that an image of exactly 10 MB passes the body limit and reaches
    /// extraction, and that one byte more is rejected by the size check.
    ///
    /// Expected: 500 (no OCR key configured) for 10 MB, 400 for 10 MB + 1
    #[tokio::test]
    async fn accepts_full_size_card_image() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap().clone();
        let http = reqwest::Client::new();
        let weather = WeatherClient::new(http.clone(), None, "http://127.0.0.1:9");
        let state = AppState::new(db, Arc::new(Config::test()), http, weather);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(state)).await.unwrap() });
        let base_url = format!("http://{addr}");

        assert_eq!(
            upload_status(&base_url, MAX_IMAGE_BYTES).await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            upload_status(&base_url, MAX_IMAGE_BYTES + 1).await,
            StatusCode::BAD_REQUEST
        );
    }
}
