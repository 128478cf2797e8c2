use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConnectDiscordDto {
    #[serde(default)]
    pub discord_user_id: String,
    #[serde(default)]
    pub channel_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SubscribeDto {
    #[serde(default)]
    pub city: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Local delivery time as `HH:MM`; hourly delivery when absent.
    #[serde(default)]
    pub notification_time: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateCityDto {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub notification_time: Option<String>,
}

/// Stored Discord link as returned after a mutation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DiscordLinkDto {
    pub user_id: Option<String>,
    pub channel_id: Option<String>,
    pub subscribed: bool,
    pub notification_city: Option<String>,
    pub notification_time: Option<String>,
    pub last_notification: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct DiscordLinkResponseDto {
    pub message: String,
    pub discord: DiscordLinkDto,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DiscordStatusDto {
    pub connected: bool,
    pub subscribed: bool,
    pub notification_city: Option<String>,
    pub notification_time: Option<String>,
    pub last_notification: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct DiscordStatusResponseDto {
    pub discord: DiscordStatusDto,
}
