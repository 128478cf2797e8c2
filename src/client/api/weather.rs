use crate::{
    client::{api::cache::cached_get, model::error::ApiError},
    model::weather::{CitySearchResponseDto, CurrentWeatherResponseDto, ForecastResponseDto},
};

fn coords_query(lat: f64, lon: f64, units: &str) -> String {
    format!("lat={lat}&lon={lon}&units={units}")
}

pub async fn get_current(
    lat: f64,
    lon: f64,
    units: &str,
) -> Result<CurrentWeatherResponseDto, ApiError> {
    cached_get(&format!("/api/weather/current?{}", coords_query(lat, lon, units))).await
}

pub async fn get_forecast(
    lat: f64,
    lon: f64,
    units: &str,
) -> Result<ForecastResponseDto, ApiError> {
    cached_get(&format!("/api/weather/forecast?{}", coords_query(lat, lon, units))).await
}

pub async fn search_cities(query: &str) -> Result<CitySearchResponseDto, ApiError> {
    let q: String = url_escape(query.trim());
    cached_get(&format!("/api/weather/search?q={q}")).await
}

/// Percent-encodes a query value.
fn url_escape(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}
