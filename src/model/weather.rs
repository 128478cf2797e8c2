use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct LocationDto {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct WeatherConditionDto {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct WindDto {
    pub speed: f64,
    pub direction: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeatherDto {
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: i64,
    pub pressure: i64,
    /// Kilometres.
    pub visibility: f64,
    pub uv_index: f64,
    pub wind: WindDto,
    pub weather: WeatherConditionDto,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CurrentWeatherResponseDto {
    pub location: LocationDto,
    pub current: CurrentWeatherDto,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct TemperatureRangeDto {
    pub min: i64,
    pub max: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DailyForecastDto {
    pub date: DateTime<Utc>,
    pub temperature: TemperatureRangeDto,
    pub weather: WeatherConditionDto,
    pub humidity: i64,
    pub wind_speed: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecastDto {
    pub time: DateTime<Utc>,
    pub temperature: i64,
    pub weather: WeatherConditionDto,
    pub humidity: i64,
    pub wind_speed: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct ForecastResponseDto {
    pub location: LocationDto,
    pub daily: Vec<DailyForecastDto>,
    pub hourly: Vec<HourlyForecastDto>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct GeolocationWeatherDto {
    pub location: LocationDto,
    pub current: CurrentWeatherDto,
    pub hourly: Vec<HourlyForecastDto>,
    pub daily: Vec<DailyForecastDto>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CitySearchResultDto {
    pub name: String,
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub state: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CitySearchResponseDto {
    pub results: Vec<CitySearchResultDto>,
    pub count: usize,
}
