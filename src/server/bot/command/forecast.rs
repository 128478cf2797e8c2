use dioxus_logger::tracing;

use super::Reply;
use crate::server::{
    model::weather::Units,
    service::{notification::forecast_embed, weather::client::WeatherClient},
};

/// `/forecast city`: five daily lines.
pub async fn run(weather: &WeatherClient, city: Option<&str>) -> Reply {
    let Some(city) = city else {
        return Reply::error("Please provide a city name.");
    };

    match weather.forecast_by_city(city, Units::Metric).await {
        Ok(data) => Reply::embed(forecast_embed(&data)),
        Err(e) => {
            tracing::debug!("/forecast lookup for {} failed: {}", city, e);
            Reply::error(format!(
                "Could not find forecast data for {city}. Please check the city name."
            ))
        }
    }
}
