//! Weather provider payloads and request parameters.
//!
//! The `Owm*` structs mirror the subset of OpenWeatherMap's JSON that the
//! application formats. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Measurement system passed to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    /// Parses the `units` query parameter.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "metric" => Some(Self::Metric),
            "imperial" => Some(Self::Imperial),
            "standard" => Some(Self::Standard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }
}

/// Validated coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Returns coordinates when both values are finite and within range.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwmCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwmCondition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwmMain {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwmWind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwmSys {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// `/data/2.5/weather` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwmCurrent {
    pub coord: OwmCoord,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
    pub main: OwmMain,
    /// Metres.
    #[serde(default)]
    pub visibility: Option<f64>,
    #[serde(default)]
    pub uvi: Option<f64>,
    pub wind: OwmWind,
    pub sys: OwmSys,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dt: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwmForecastItem {
    pub dt: i64,
    pub main: OwmMain,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
    pub wind: OwmWind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwmCity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub coord: OwmCoord,
    /// Offset from UTC in seconds.
    #[serde(default)]
    pub timezone: i32,
}

/// `/data/2.5/forecast` response (3-hour steps over five days).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwmForecast {
    #[serde(default)]
    pub list: Vec<OwmForecastItem>,
    pub city: OwmCity,
}

/// `/geo/1.0/direct` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPlace {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub state: Option<String>,
}
