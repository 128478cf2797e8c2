//! OpenWeatherMap HTTP client with response caching.
//!
//! Responses are cached per path and sorted query parameters: five minutes for
//! weather data and ten minutes for geocoding. Concurrent identical requests
//! share one upstream call. Once the provider rejects the API key, every later
//! call fails immediately without network I/O.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use dioxus_logger::tracing;
use moka::future::{Cache, CacheBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::server::{
    error::weather::WeatherError,
    model::weather::{Coordinates, GeoPlace, OwmCurrent, OwmForecast, Units},
};

const WEATHER_TTL: Duration = Duration::from_secs(5 * 60);
const GEO_TTL: Duration = Duration::from_secs(10 * 60);
const CACHE_CAPACITY: u64 = 1_000;

/// Shared OpenWeatherMap client. Cloning shares the caches and the key latch.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
    data_url: String,
    geo_url: String,
    key_invalid: Arc<AtomicBool>,
    weather_cache: Cache<String, Arc<Value>>,
    geo_cache: Cache<String, Arc<Value>>,
}

impl WeatherClient {
    /// Creates a client against `base_url` (without the `/data/2.5` suffix).
    pub fn new(http: reqwest::Client, api_key: Option<String>, base_url: &str) -> Self {
        Self {
            http,
            api_key,
            data_url: format!("{base_url}/data/2.5"),
            geo_url: format!("{base_url}/geo/1.0"),
            key_invalid: Arc::new(AtomicBool::new(false)),
            weather_cache: CacheBuilder::new(CACHE_CAPACITY)
                .time_to_live(WEATHER_TTL)
                .build(),
            geo_cache: CacheBuilder::new(CACHE_CAPACITY)
                .time_to_live(GEO_TTL)
                .build(),
        }
    }

    /// Current conditions at a coordinate.
    pub async fn current(
        &self,
        coords: Coordinates,
        units: Units,
    ) -> Result<OwmCurrent, WeatherError> {
        self.get_weather(
            "weather",
            vec![
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("units", units.as_str().to_string()),
            ],
        )
        .await
    }

    /// Five-day, three-hour forecast at a coordinate.
    pub async fn forecast(
        &self,
        coords: Coordinates,
        units: Units,
    ) -> Result<OwmForecast, WeatherError> {
        self.get_weather(
            "forecast",
            vec![
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("units", units.as_str().to_string()),
            ],
        )
        .await
    }

    /// Current conditions for a city name.
    pub async fn current_by_city(
        &self,
        city: &str,
        units: Units,
    ) -> Result<OwmCurrent, WeatherError> {
        self.get_weather(
            "weather",
            vec![
                ("q", city.to_string()),
                ("units", units.as_str().to_string()),
            ],
        )
        .await
    }

    /// Forecast for a city name.
    pub async fn forecast_by_city(
        &self,
        city: &str,
        units: Units,
    ) -> Result<OwmForecast, WeatherError> {
        self.get_weather(
            "forecast",
            vec![
                ("q", city.to_string()),
                ("units", units.as_str().to_string()),
            ],
        )
        .await
    }

    /// Places matching a free-text query.
    pub async fn geocode(&self, query: &str, limit: u32) -> Result<Vec<GeoPlace>, WeatherError> {
        let url = format!("{}/direct", self.geo_url);
        let value = self
            .get_cached(
                &self.geo_cache,
                url,
                vec![("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        decode(&value)
    }

    async fn get_weather<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{path}", self.data_url);
        let value = self.get_cached(&self.weather_cache, url, params).await?;
        decode(&value)
    }

    async fn get_cached(
        &self,
        cache: &Cache<String, Arc<Value>>,
        url: String,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<Arc<Value>, WeatherError> {
        if self.key_invalid.load(Ordering::Relaxed) {
            return Err(WeatherError::ApiKeyInvalid);
        }
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(WeatherError::ApiKeyMissing);
        };

        params.sort();
        let key = cache_key(&url, &params);

        if cache.contains_key(&key) {
            tracing::debug!("Returning cached weather data for: {}", key);
        }

        cache
            .try_get_with(key, self.request(url, params, api_key))
            .await
            .map_err(|e| (*e).clone())
    }

    async fn request(
        &self,
        url: String,
        params: Vec<(&'static str, String)>,
        api_key: &str,
    ) -> Result<Arc<Value>, WeatherError> {
        let response = self
            .http
            .get(&url)
            .query(&params)
            .query(&[("appid", api_key)])
            .send()
            .await
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let value = response
                .json::<Value>()
                .await
                .map_err(|e| WeatherError::Request(e.to_string()))?;
            return Ok(Arc::new(value));
        }

        let body = response.text().await.unwrap_or_default();
        let message = upstream_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        tracing::error!("Weather API request failed: {} {}", status, message);

        if status == reqwest::StatusCode::UNAUTHORIZED
            || message.to_lowercase().contains("invalid api key")
        {
            self.key_invalid.store(true, Ordering::Relaxed);
            tracing::error!(
                "OpenWeather rejected WEATHER_API_KEY; weather requests are disabled until restart"
            );
            return Err(WeatherError::ApiKeyInvalid);
        }

        Err(WeatherError::Upstream(status.as_u16(), message))
    }
}

fn cache_key(url: &str, params: &[(&'static str, String)]) -> String {
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{url}?{}", query.join("&"))
}

/// Extracts the provider's `message` field, falling back to the raw body.
fn upstream_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
    Some(message.unwrap_or_else(|| body.to_string()))
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, WeatherError> {
    serde_json::from_value(value.clone()).map_err(|e| WeatherError::Request(format!("Unexpected response: {e}")))
}
