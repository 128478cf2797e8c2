//! Cron jobs delivering Discord weather notifications.

pub mod weather_notifications;
