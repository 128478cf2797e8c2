//! Discord weather notifications.
//!
//! Builds the weather and forecast embeds shared by the slash commands and the
//! scheduled jobs, and delivers them to subscribed users' channels.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;
use serenity::{
    all::{ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, Timestamp},
    http::Http,
};
use serde_json::json;

use crate::server::{
    data::{api_event::ApiEventRepository, user::UserRepository},
    error::AppError,
    model::{
        api_event::NewApiEventParam,
        user::User,
        weather::{OwmCurrent, OwmForecast, Units},
    },
    service::weather::{client::WeatherClient, format},
};

const DEFAULT_COLOUR: u32 = 0x00AE86;
const FOOTER: &str = "Weather Bot • Powered by OpenWeatherMap";
const FORECAST_DAYS: usize = 5;

/// Emoji shown in the embed title for an OpenWeatherMap condition group.
pub fn weather_emoji(main: &str) -> &'static str {
    match main {
        "Clear" => "☀️",
        "Clouds" => "☁️",
        "Rain" => "🌧️",
        "Snow" => "❄️",
        "Thunderstorm" => "⛈️",
        "Mist" | "Fog" => "🌫️",
        _ => "🌤️",
    }
}

/// Embed colour for an OpenWeatherMap condition group.
pub fn weather_colour(main: &str) -> u32 {
    match main {
        "Clear" => 0xFFD700,
        "Clouds" => 0x87CEEB,
        "Rain" => 0x4682B4,
        "Snow" => 0xE6E6FA,
        "Thunderstorm" => 0x2F4F4F,
        "Mist" | "Fog" => 0xC0C0C0,
        _ => DEFAULT_COLOUR,
    }
}

/// Metres per second to kilometres per hour, one decimal.
fn kmh(metres_per_second: f64) -> f64 {
    (metres_per_second * 36.0).round() / 10.0
}

/// Current-conditions embed, in metric units.
pub fn weather_embed(data: &OwmCurrent) -> CreateEmbed {
    let current = format::current(data);
    let main = current.weather.main.as_str();

    CreateEmbed::new()
        .title(format!(
            "{} Weather in {}, {}",
            weather_emoji(main),
            data.name,
            data.sys.country
        ))
        .description(format!(
            "**{}°C** - {}",
            current.temperature, current.weather.description
        ))
        .field("🌡️ Feels Like", format!("{}°C", current.feels_like), true)
        .field("💧 Humidity", format!("{}%", current.humidity), true)
        .field(
            "💨 Wind Speed",
            format!("{} km/h", kmh(current.wind.speed)),
            true,
        )
        .colour(weather_colour(main))
        .timestamp(Timestamp::now())
        .footer(CreateEmbedFooter::new(FOOTER))
}

/// Five-day forecast embed with one line per local day.
pub fn forecast_embed(data: &OwmForecast) -> CreateEmbed {
    let offset = Duration::seconds(i64::from(data.city.timezone));
    let mut embed = CreateEmbed::new()
        .title(format!(
            "🌤️ 5-Day Forecast for {}, {}",
            data.city.name, data.city.country
        ))
        .colour(DEFAULT_COLOUR)
        .timestamp(Timestamp::now())
        .footer(CreateEmbedFooter::new(FOOTER));

    for day in format::daily(&data.list, data.city.timezone)
        .into_iter()
        .take(FORECAST_DAYS)
    {
        embed = embed.field(
            (day.date + offset).format("%a, %b %-d").to_string(),
            format!(
                "{}°C - {}°C • {}",
                day.temperature.min, day.temperature.max, day.weather.description
            ),
            false,
        );
    }

    embed
}

/// Confirmation embed for the `/subscribe` command.
pub fn subscribed_embed(city: &str, data: &OwmCurrent) -> CreateEmbed {
    let current = format::current(data);

    CreateEmbed::new()
        .title("🌤️ Weather Notifications Subscribed!")
        .description(format!("You will now receive weather updates for **{city}**"))
        .field(
            "Current Weather",
            format!("{}°C - {}", current.temperature, current.weather.description),
            true,
        )
        .field("Humidity", format!("{}%", current.humidity), true)
        .field(
            "Wind Speed",
            format!("{} km/h", kmh(current.wind.speed)),
            true,
        )
        .colour(DEFAULT_COLOUR)
        .timestamp(Timestamp::now())
}

/// Delivers notifications to subscribed users' channels.
pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
    http: Arc<Http>,
    weather: &'a WeatherClient,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection, http: Arc<Http>, weather: &'a WeatherClient) -> Self {
        Self { db, http, weather }
    }

    /// Posts current conditions for the user's notification city and stamps the
    /// delivery time.
    ///
    /// # Arguments
    /// - `user` - Subscribed user with a channel and notification city
    /// - `now` - Delivery time recorded as the last notification
    ///
    /// # Returns
    /// - `Ok(())` - Message posted and delivery recorded
    /// - `Err(AppError)` - Missing link data, weather lookup or Discord failure
    pub async fn send_weather_update(&self, user: &User, now: DateTime<Utc>) -> Result<(), AppError> {
        let (channel_id, city) = delivery_target(user)?;

        let data = self.weather.current_by_city(city, Units::Metric).await?;
        let heading = if user.discord.notification_time.is_some() {
            format!("🌤️ **Daily Weather Update for {city}**")
        } else {
            format!("🌤️ **Hourly Weather Update for {city}**")
        };

        channel_id
            .send_message(
                &self.http,
                CreateMessage::new()
                    .content(heading)
                    .embed(weather_embed(&data)),
            )
            .await?;

        UserRepository::new(self.db).mark_notified(user.id, now).await?;
        self.record_delivery(user, "weather_update").await;

        tracing::info!(
            "Sent weather notification to user {} for {}",
            user.username,
            city
        );

        Ok(())
    }

    /// Posts the five-day forecast for the user's notification city.
    pub async fn send_daily_summary(&self, user: &User) -> Result<(), AppError> {
        let (channel_id, city) = delivery_target(user)?;

        let data = self.weather.forecast_by_city(city, Units::Metric).await?;

        channel_id
            .send_message(
                &self.http,
                CreateMessage::new()
                    .content(format!("🌅 **Daily Weather Summary for {city}**"))
                    .embed(forecast_embed(&data)),
            )
            .await?;

        self.record_delivery(user, "daily_summary").await;

        tracing::info!("Sent daily summary to user {} for {}", user.username, city);

        Ok(())
    }

    /// Records the delivery as a `discord_event` so it shows in the notifications metric.
    async fn record_delivery(&self, user: &User, kind: &str) {
        let result = ApiEventRepository::new(self.db)
            .create(NewApiEventParam {
                event_type: "discord_notification".to_string(),
                user_id: Some(user.id),
                action: Some("discord_event".to_string()),
                query: None,
                meta: Some(json!({ "kind": kind, "city": user.discord.notification_city })),
                ip: None,
            })
            .await;

        if let Err(e) = result {
            tracing::warn!("Failed to record notification event: {}", e);
        }
    }
}

fn delivery_target(user: &User) -> Result<(ChannelId, &str), AppError> {
    let channel_id = user
        .discord
        .channel_id
        .as_deref()
        .and_then(|id| id.parse::<u64>().ok())
        .filter(|id| *id != 0)
        .map(ChannelId::new)
        .ok_or_else(|| {
            AppError::InternalError(format!("User {} has no valid Discord channel", user.id))
        })?;
    let city = user
        .discord
        .notification_city
        .as_deref()
        .ok_or_else(|| {
            AppError::InternalError(format!("User {} has no notification city", user.id))
        })?;

    Ok((channel_id, city))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::weather::{
        OwmCity, OwmCondition, OwmCoord, OwmForecastItem, OwmMain, OwmSys, OwmWind,
    };

    fn main(temp: f64) -> OwmMain {
        OwmMain {
            temp,
            feels_like: temp - 1.0,
            temp_min: temp,
            temp_max: temp,
            humidity: 70.0,
            pressure: 1012.0,
        }
    }

    fn rain() -> Vec<OwmCondition> {
        vec![OwmCondition {
            main: "Rain".to_string(),
            description: "light rain".to_string(),
            icon: "10d".to_string(),
        }]
    }

    #[test]
    fn colours_embed_by_condition() {
        let data = OwmCurrent {
            coord: OwmCoord { lat: 21.0, lon: 105.8 },
            weather: rain(),
            main: main(27.6),
            visibility: Some(10000.0),
            uvi: None,
            wind: OwmWind {
                speed: 5.0,
                deg: None,
            },
            sys: OwmSys {
                country: "VN".to_string(),
                sunrise: 0,
                sunset: 0,
            },
            name: "Hanoi".to_string(),
            dt: 0,
        };

        let embed = serde_json::to_value(weather_embed(&data)).unwrap();

        assert_eq!(embed["title"], "🌧️ Weather in Hanoi, VN");
        assert_eq!(embed["description"], "**28°C** - light rain");
        assert_eq!(embed["color"], 0x4682B4);
        assert_eq!(embed["fields"][2]["value"], "18 km/h");
    }

    #[test]
    fn lists_at_most_five_forecast_days() {
        let day = 24 * 60 * 60;
        let data = OwmForecast {
            list: (0..7)
                .map(|i| OwmForecastItem {
                    dt: 1_700_000_000 + i * day,
                    main: main(20.0 + i as f64),
                    weather: rain(),
                    wind: OwmWind {
                        speed: 1.0,
                        deg: None,
                    },
                })
                .collect(),
            city: OwmCity {
                name: "Hanoi".to_string(),
                country: "VN".to_string(),
                coord: OwmCoord { lat: 21.0, lon: 105.8 },
                timezone: 7 * 3600,
            },
        };

        let embed = serde_json::to_value(forecast_embed(&data)).unwrap();

        assert_eq!(embed["fields"].as_array().unwrap().len(), 5);
        assert_eq!(embed["fields"][0]["value"], "20°C - 20°C • light rain");
    }

    #[test]
    fn falls_back_to_default_style() {
        assert_eq!(weather_emoji("Tornado"), "🌤️");
        assert_eq!(weather_colour("Tornado"), DEFAULT_COLOUR);
        assert_eq!(weather_emoji("Fog"), weather_emoji("Mist"));
    }
}
