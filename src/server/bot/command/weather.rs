use dioxus_logger::tracing;

use super::Reply;
use crate::server::{
    model::weather::Units,
    service::{notification::weather_embed, weather::client::WeatherClient},
};

/// `/weather city`: current conditions in metric units.
pub async fn run(weather: &WeatherClient, city: Option<&str>) -> Reply {
    let Some(city) = city else {
        return Reply::error("Please provide a city name.");
    };

    match weather.current_by_city(city, Units::Metric).await {
        Ok(data) => Reply::embed(weather_embed(&data)),
        Err(e) => {
            tracing::debug!("/weather lookup for {} failed: {}", city, e);
            Reply::error(format!(
                "Could not find weather data for {city}. Please check the city name."
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests a lookup that cannot reach the provider.
    ///
    /// Expected: ephemeral error naming the city
    #[tokio::test]
    async fn replies_privately_on_lookup_failure() {
        let weather = WeatherClient::new(reqwest::Client::new(), None, "http://127.0.0.1:9");

        let reply = run(&weather, Some("Atlantis")).await;

        assert!(reply.ephemeral);
        assert!(reply.embed.is_none());
        assert_eq!(
            reply.content.as_deref(),
            Some("Could not find weather data for Atlantis. Please check the city name.")
        );
    }
}
