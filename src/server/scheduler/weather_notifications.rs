use std::sync::Arc;

use chrono::{DateTime, Local, Timelike, Utc};
use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;
use serenity::http::Http;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    data::user::UserRepository,
    error::AppError,
    model::discord::DiscordLink,
    service::{notification::NotificationService, weather::client::WeatherClient},
};

/// Whether `link` should receive a weather update during the minute containing `now`.
///
/// A user with a `notification_time` is due when the local `HH:MM` matches it; a user
/// without one is due at the top of every hour. Users already notified within the
/// current minute are never due.
pub fn is_due(link: &DiscordLink, now: DateTime<Local>) -> bool {
    let minute_start = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
        .with_timezone(&Utc);

    if link
        .last_notification
        .is_some_and(|last| last >= minute_start)
    {
        return false;
    }

    match link.notification_time.as_deref() {
        Some(time) => now.format("%H:%M").to_string() == time,
        None => now.minute() == 0,
    }
}

/// Starts the notification scheduler
///
/// Two jobs are registered:
/// - every minute, weather updates for users whose delivery time has come
/// - daily at 08:00 server time, a five-day forecast for every subscribed user
///
/// # Arguments
/// - `db`: Database connection
/// - `discord_http`: Discord HTTP client for posting to channels
/// - `weather`: Weather client shared with the API
pub async fn start_scheduler(
    db: DatabaseConnection,
    discord_http: Arc<Http>,
    weather: WeatherClient,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_db = db.clone();
    let job_http = discord_http.clone();
    let job_weather = weather.clone();
    let updates = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let db = job_db.clone();
        let http = job_http.clone();
        let weather = job_weather.clone();

        Box::pin(async move {
            if let Err(e) = process_weather_updates(&db, http, &weather).await {
                tracing::error!("Error processing weather notifications: {}", e);
            }
        })
    })?;

    let summaries = Job::new_async_tz("0 0 8 * * *", Local, move |_uuid, _lock| {
        let db = db.clone();
        let http = discord_http.clone();
        let weather = weather.clone();

        Box::pin(async move {
            if let Err(e) = process_daily_summaries(&db, http, &weather).await {
                tracing::error!("Error processing daily summaries: {}", e);
            }
        })
    })?;

    scheduler.add(updates).await?;
    scheduler.add(summaries).await?;
    scheduler.start().await?;

    tracing::info!("Weather notification scheduler started");

    Ok(())
}

async fn process_weather_updates(
    db: &DatabaseConnection,
    discord_http: Arc<Http>,
    weather: &WeatherClient,
) -> Result<(), AppError> {
    let now = Local::now();
    let due: Vec<_> = UserRepository::new(db)
        .get_subscribed()
        .await?
        .into_iter()
        .filter(|user| is_due(&user.discord, now))
        .collect();

    if due.is_empty() {
        return Ok(());
    }

    tracing::debug!("{} users due for a weather update", due.len());

    let service = NotificationService::new(db, discord_http, weather);
    for user in due {
        if let Err(e) = service
            .send_weather_update(&user, now.with_timezone(&Utc))
            .await
        {
            tracing::error!("Failed to notify user {}: {}", user.id, e);
        }
    }

    Ok(())
}

async fn process_daily_summaries(
    db: &DatabaseConnection,
    discord_http: Arc<Http>,
    weather: &WeatherClient,
) -> Result<(), AppError> {
    let users = UserRepository::new(db).get_subscribed().await?;
    let service = NotificationService::new(db, discord_http, weather);

    for user in users {
        if let Err(e) = service.send_daily_summary(&user).await {
            tracing::error!("Failed to send daily summary to user {}: {}", user.id, e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 6, 1, hour, minute, second)
            .single()
            .unwrap()
    }

    fn link(time: Option<&str>) -> DiscordLink {
        DiscordLink {
            user_id: Some("1234".to_string()),
            channel_id: Some("5678".to_string()),
            subscribed: true,
            notification_city: Some("Hanoi".to_string()),
            notification_time: time.map(str::to_string),
            last_notification: None,
        }
    }

    #[test]
    fn matches_configured_time() {
        let link = link(Some("07:30"));

        assert!(is_due(&link, at(7, 30, 0)));
        assert!(is_due(&link, at(7, 30, 45)));
        assert!(!is_due(&link, at(7, 31, 0)));
        assert!(!is_due(&link, at(19, 30, 0)));
    }

    #[test]
    fn defaults_to_top_of_the_hour() {
        let link = link(None);

        assert!(is_due(&link, at(0, 0, 0)));
        assert!(is_due(&link, at(13, 0, 20)));
        assert!(!is_due(&link, at(13, 1, 0)));
    }

    #[test]
    fn skips_users_notified_this_minute() {
        let now = at(7, 30, 40);
        let mut link = link(Some("07:30"));

        link.last_notification = Some(at(7, 30, 5).with_timezone(&Utc));
        assert!(!is_due(&link, now));

        link.last_notification = Some((at(7, 30, 0) - Duration::seconds(1)).with_timezone(&Utc));
        assert!(is_due(&link, now));
    }
}
