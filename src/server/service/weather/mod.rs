//! Weather lookups composed from the OpenWeatherMap client.

pub mod client;
pub mod format;

use chrono::Utc;

use crate::{
    model::weather::{
        CitySearchResponseDto, CitySearchResultDto, CurrentWeatherResponseDto,
        ForecastResponseDto, GeolocationWeatherDto,
    },
    server::{
        error::AppError,
        model::weather::{Coordinates, Units},
        service::weather::client::WeatherClient,
    },
};

const SEARCH_MIN_CHARS: usize = 2;
const SEARCH_MAX_CHARS: usize = 100;
const SEARCH_LIMIT: u32 = 10;

pub struct WeatherService<'a> {
    client: &'a WeatherClient,
}

impl<'a> WeatherService<'a> {
    pub fn new(client: &'a WeatherClient) -> Self {
        Self { client }
    }

    pub async fn current(
        &self,
        coords: Coordinates,
        units: Units,
    ) -> Result<CurrentWeatherResponseDto, AppError> {
        let data = self.client.current(coords, units).await?;
        Ok(format::current_response(&data))
    }

    pub async fn forecast(
        &self,
        coords: Coordinates,
        units: Units,
    ) -> Result<ForecastResponseDto, AppError> {
        let data = self.client.forecast(coords, units).await?;
        Ok(format::forecast_response(&data))
    }

    /// Current conditions and forecast for a coordinate, fetched concurrently.
    pub async fn geolocation(
        &self,
        coords: Coordinates,
        units: Units,
    ) -> Result<GeolocationWeatherDto, AppError> {
        let (current, forecast) = tokio::join!(
            self.client.current(coords, units),
            self.client.forecast(coords, units)
        );
        let current = current?;
        let forecast = forecast?;

        Ok(GeolocationWeatherDto {
            location: format::location_of_current(&current),
            current: format::current(&current),
            hourly: format::hourly(&forecast.list),
            daily: format::daily(&forecast.list, forecast.city.timezone),
            timestamp: Utc::now(),
        })
    }

    /// Looks up places by name.
    ///
    /// The query is trimmed and must have at least two characters; longer queries
    /// are cut to 100 characters.
    ///
    /// # Returns
    /// - `Ok(CitySearchResponseDto)` - Up to ten matches
    /// - `Err(AppError::BadRequest)` - Query too short
    /// - `Err(AppError::SearchErr)` - Provider or key failure
    pub async fn search(&self, query: &str) -> Result<CitySearchResponseDto, AppError> {
        let query = normalize_search_query(query).ok_or_else(|| {
            AppError::BadRequest("Search query must be at least 2 characters".to_string())
        })?;

        let places = self
            .client
            .geocode(&query, SEARCH_LIMIT)
            .await
            .map_err(AppError::SearchErr)?;

        let results: Vec<CitySearchResultDto> = places
            .into_iter()
            .map(|place| CitySearchResultDto {
                name: place.name,
                country: place.country,
                lat: place.lat,
                lon: place.lon,
                state: place.state,
            })
            .collect();

        Ok(CitySearchResponseDto {
            count: results.len(),
            results,
        })
    }
}

/// Trims and truncates a search query, rejecting ones that are too short.
pub fn normalize_search_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.chars().count() < SEARCH_MIN_CHARS {
        return None;
    }
    Some(trimmed.chars().take(SEARCH_MAX_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_search_queries() {
        assert_eq!(normalize_search_query("  Ha Noi "), Some("Ha Noi".to_string()));
        assert_eq!(normalize_search_query(" H "), None);
        assert_eq!(
            normalize_search_query(&"x".repeat(150)).map(|q| q.len()),
            Some(SEARCH_MAX_CHARS)
        );
    }

    #[tokio::test]
    async fn rejects_short_queries_before_calling_provider() {
        let client = WeatherClient::new(reqwest::Client::new(), None, "http://127.0.0.1:9");

        let result = WeatherService::new(&client).search("a").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn maps_missing_key_to_search_error() {
        let client = WeatherClient::new(reqwest::Client::new(), None, "http://127.0.0.1:9");

        let result = WeatherService::new(&client).search("Hanoi").await;

        assert!(matches!(result, Err(AppError::SearchErr(e)) if e.is_api_key_error()));
    }
}
