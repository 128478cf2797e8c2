use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use super::Reply;
use crate::server::{
    model::{discord::ConnectDiscordParam, weather::Units},
    service::{
        discord::DiscordService, notification::subscribed_embed, weather::client::WeatherClient,
    },
};

const USER_NOT_FOUND: &str =
    "User not found. Please make sure you have an account in the weather app with that email.";
const SUBSCRIBE_FAILED: &str =
    "Error subscribing to notifications. Please check the city name and try again.";

/// `/subscribe city email`: links the invoker and channel to the app account with
/// that email and subscribes it to hourly updates. The city is checked with a
/// weather lookup before anything is stored.
pub async fn run(
    db: &DatabaseConnection,
    weather: &WeatherClient,
    discord_user_id: u64,
    channel_id: u64,
    city: Option<&str>,
    email: Option<&str>,
) -> Reply {
    let (Some(city), Some(email)) = (city, email) else {
        return Reply::error("Please provide both a city and an email.");
    };

    let data = match weather.current_by_city(city, Units::Metric).await {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!("/subscribe city check for {} failed: {}", city, e);
            return Reply::error(SUBSCRIBE_FAILED);
        }
    };

    let link = ConnectDiscordParam {
        discord_user_id: discord_user_id.to_string(),
        channel_id: channel_id.to_string(),
    };

    match DiscordService::new(db)
        .subscribe_by_email(email, link, city.to_string())
        .await
    {
        Ok(Some(_)) => Reply::embed(subscribed_embed(city, &data)),
        Ok(None) => Reply::error(USER_NOT_FOUND),
        Err(e) => {
            tracing::error!("/subscribe failed for {}: {}", discord_user_id, e);
            Reply::error(SUBSCRIBE_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests a subscription for a city the provider cannot resolve.
    ///
    /// Expected: ephemeral error and nothing stored
    #[tokio::test]
    async fn rejects_unresolvable_city() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let weather = WeatherClient::new(reqwest::Client::new(), None, "http://127.0.0.1:9");

        let reply = run(&db, &weather, 1, 2, Some("Atlantis"), Some("a@example.com")).await;

        assert!(reply.ephemeral);
        assert_eq!(reply.content.as_deref(), Some(SUBSCRIBE_FAILED));
    }
}
