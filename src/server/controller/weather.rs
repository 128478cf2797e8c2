use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    model::{
        api::ErrorDto,
        weather::{
            CitySearchResponseDto, CurrentWeatherResponseDto, ForecastResponseDto,
            GeolocationWeatherDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::weather::{Coordinates, Units},
        service::weather::WeatherService,
        state::AppState,
    },
};

/// Tag for grouping weather endpoints in OpenAPI documentation
pub static WEATHER_TAG: &str = "weather";

/// Coordinates as received on the query string, validated by the handlers.
#[derive(Deserialize)]
pub struct CoordinateQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub units: Option<String>,
}

#[derive(Deserialize)]
pub struct HistoricalQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub dt: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl CoordinateQuery {
    /// Validates the coordinate pair and unit system.
    ///
    /// # Returns
    /// - `Ok((Coordinates, Units))` - Units default to metric
    /// - `Err(AppError::BadRequest)` - Missing or out-of-range values, unknown units
    pub fn parse(&self) -> Result<(Coordinates, Units), AppError> {
        let (Some(lat), Some(lon)) = (present(&self.lat), present(&self.lon)) else {
            return Err(AppError::BadRequest(
                "Latitude and longitude are required".to_string(),
            ));
        };

        let coords = match (lat.parse::<f64>(), lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Coordinates::new(lat, lon),
            _ => None,
        }
        .ok_or_else(|| AppError::BadRequest("Invalid coordinates provided".to_string()))?;

        let units = match present(&self.units) {
            None => Units::default(),
            Some(units) => Units::parse(units).ok_or_else(|| {
                AppError::BadRequest(
                    "Units must be one of metric, imperial or standard".to_string(),
                )
            })?,
        };

        Ok((coords, units))
    }
}

/// Get current weather for a coordinate.
///
/// # Access Control
/// - Authenticated user
///
/// # Arguments
/// - `state` - Application state containing the weather client
/// - `headers` - Request headers carrying the bearer token
/// - `query` - `lat`, `lon` and optional `units`
///
/// # Returns
/// - `200 OK` - Formatted current conditions
/// - `400 Bad Request` - Missing or invalid coordinates
/// - `401 Unauthorized` - Not authenticated
/// - `500 Internal Server Error` - Weather provider failure
#[utoipa::path(
    get,
    path = "/api/weather/current",
    tag = WEATHER_TAG,
    params(
        ("lat" = f64, Query, description = "Latitude, -90 to 90"),
        ("lon" = f64, Query, description = "Longitude, -180 to 180"),
        ("units" = Option<String>, Query, description = "metric (default), imperial or standard")
    ),
    responses(
        (status = 200, description = "Current weather", body = CurrentWeatherResponseDto),
        (status = 400, description = "Invalid coordinates", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Weather provider error", body = ErrorDto)
    ),
)]
pub async fn get_current(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CoordinateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let (coords, units) = query.parse()?;
    let weather = WeatherService::new(&state.weather)
        .current(coords, units)
        .await?;

    Ok(Json(weather))
}

/// Get the 24-hour and daily forecast for a coordinate.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `200 OK` - Hourly (first 8 entries) and daily forecast
/// - `400 Bad Request` - Missing or invalid coordinates
/// - `401 Unauthorized` - Not authenticated
/// - `500 Internal Server Error` - Weather provider failure
#[utoipa::path(
    get,
    path = "/api/weather/forecast",
    tag = WEATHER_TAG,
    params(
        ("lat" = f64, Query, description = "Latitude, -90 to 90"),
        ("lon" = f64, Query, description = "Longitude, -180 to 180"),
        ("units" = Option<String>, Query, description = "metric (default), imperial or standard")
    ),
    responses(
        (status = 200, description = "Forecast", body = ForecastResponseDto),
        (status = 400, description = "Invalid coordinates", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 500, description = "Weather provider error", body = ErrorDto)
    ),
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CoordinateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let (coords, units) = query.parse()?;
    let forecast = WeatherService::new(&state.weather)
        .forecast(coords, units)
        .await?;

    Ok(Json(forecast))
}

/// Historical weather. Validates its input, then reports the feature as disabled.
///
/// # Access Control
/// - Authenticated user
///
/// # Returns
/// - `400 Bad Request` - Missing or invalid coordinates or timestamp
/// - `401 Unauthorized` - Not authenticated
/// - `501 Not Implemented` - Always, for valid input
#[utoipa::path(
    get,
    path = "/api/weather/historical",
    tag = WEATHER_TAG,
    params(
        ("lat" = f64, Query, description = "Latitude"),
        ("lon" = f64, Query, description = "Longitude"),
        ("dt" = i64, Query, description = "Unix timestamp")
    ),
    responses(
        (status = 400, description = "Invalid input", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 501, description = "Historical data is disabled", body = ErrorDto)
    ),
)]
pub async fn get_historical(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoricalQuery>,
) -> Result<(), AppError> {
    let _ = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[])
        .await?;

    let (Some(lat), Some(lon), Some(dt)) =
        (present(&query.lat), present(&query.lon), present(&query.dt))
    else {
        return Err(AppError::BadRequest(
            "Latitude, longitude, and timestamp (dt) are required".to_string(),
        ));
    };

    if lat.parse::<f64>().is_err() || lon.parse::<f64>().is_err() || dt.parse::<i64>().is_err()
    {
        return Err(AppError::BadRequest(
            "Invalid coordinates or timestamp provided".to_string(),
        ));
    }

    Err(AppError::NotImplemented(
        "Historical weather endpoint is disabled on this server. Enable a provider or contact the administrator."
            .to_string(),
    ))
}

/// Search cities by name.
///
/// # Access Control
/// - Public
///
/// # Returns
/// - `200 OK` - Up to ten matching places
/// - `400 Bad Request` - Query shorter than two characters
/// - `500 Internal Server Error` - `API_KEY_MISSING` or `SEARCH_FAILED`
#[utoipa::path(
    get,
    path = "/api/weather/search",
    tag = WEATHER_TAG,
    params(
        ("q" = String, Query, description = "City name, at least 2 characters")
    ),
    responses(
        (status = 200, description = "Matching cities", body = CitySearchResponseDto),
        (status = 400, description = "Query too short", body = ErrorDto),
        (status = 500, description = "Search failed", body = ErrorDto)
    ),
)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let results = WeatherService::new(&state.weather).search(&query.q).await?;

    Ok(Json(results))
}

/// Current weather and forecast for the caller's location.
///
/// # Access Control
/// - Public
///
/// # Returns
/// - `200 OK` - Current, hourly and daily weather in one payload
/// - `400 Bad Request` - Missing or invalid coordinates
/// - `500 Internal Server Error` - Weather provider failure
#[utoipa::path(
    get,
    path = "/api/weather/geolocation",
    tag = WEATHER_TAG,
    params(
        ("lat" = f64, Query, description = "Latitude, -90 to 90"),
        ("lon" = f64, Query, description = "Longitude, -180 to 180"),
        ("units" = Option<String>, Query, description = "metric (default), imperial or standard")
    ),
    responses(
        (status = 200, description = "Weather for location", body = GeolocationWeatherDto),
        (status = 400, description = "Invalid coordinates", body = ErrorDto),
        (status = 500, description = "Weather provider error", body = ErrorDto)
    ),
)]
pub async fn get_geolocation(
    State(state): State<AppState>,
    Query(query): Query<CoordinateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (coords, units) = query.parse()?;
    let weather = WeatherService::new(&state.weather)
        .geolocation(coords, units)
        .await?;

    Ok(Json(weather))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lat: Option<&str>, lon: Option<&str>, units: Option<&str>) -> CoordinateQuery {
        CoordinateQuery {
            lat: lat.map(str::to_string),
            lon: lon.map(str::to_string),
            units: units.map(str::to_string),
        }
    }

    fn message(result: Result<(Coordinates, Units), AppError>) -> String {
        match result {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected BadRequest, got {:?}", other.map(|(c, _)| c)),
        }
    }

    #[test]
    fn parses_coordinates_with_default_units() {
        let (coords, units) = query(Some("21.03"), Some("105.85"), None).parse().unwrap();

        assert_eq!(coords, Coordinates { lat: 21.03, lon: 105.85 });
        assert_eq!(units, Units::Metric);
    }

    #[test]
    fn requires_both_coordinates() {
        assert_eq!(
            message(query(Some("21"), None, None).parse()),
            "Latitude and longitude are required"
        );
        assert_eq!(
            message(query(Some(""), Some("105"), None).parse()),
            "Latitude and longitude are required"
        );
    }

    #[test]
    fn rejects_invalid_coordinates() {
        assert_eq!(
            message(query(Some("91"), Some("0"), None).parse()),
            "Invalid coordinates provided"
        );
        assert_eq!(
            message(query(Some("abc"), Some("0"), None).parse()),
            "Invalid coordinates provided"
        );
    }

    #[test]
    fn rejects_unknown_units() {
        assert!(query(Some("0"), Some("0"), Some("kelvin")).parse().is_err());
        assert_eq!(
            query(Some("0"), Some("0"), Some("imperial")).parse().unwrap().1,
            Units::Imperial
        );
    }
}
