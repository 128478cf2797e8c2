//! Discord link stored on a user account.

use chrono::{DateTime, Utc};

use crate::{
    model::discord::{
        ConnectDiscordDto, DiscordLinkDto, DiscordStatusDto, SubscribeDto, UpdateCityDto,
    },
    server::{
        error::validation::{ValidationError, Validator},
        util::validate::{is_valid_notification_time, non_blank},
    },
};

/// Discord account, channel and notification settings for a user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscordLink {
    /// Discord user ID (snowflake) as text.
    pub user_id: Option<String>,
    /// Channel that receives notifications.
    pub channel_id: Option<String>,
    pub subscribed: bool,
    pub notification_city: Option<String>,
    /// Local `HH:MM`; `None` means hourly delivery.
    pub notification_time: Option<String>,
    pub last_notification: Option<DateTime<Utc>>,
}

impl DiscordLink {
    /// Whether a Discord account has been linked.
    pub fn is_connected(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn into_dto(self) -> DiscordLinkDto {
        DiscordLinkDto {
            user_id: self.user_id,
            channel_id: self.channel_id,
            subscribed: self.subscribed,
            notification_city: self.notification_city,
            notification_time: self.notification_time,
            last_notification: self.last_notification,
        }
    }

    pub fn into_status_dto(self) -> DiscordStatusDto {
        DiscordStatusDto {
            connected: self.is_connected(),
            subscribed: self.subscribed,
            notification_city: self.notification_city,
            notification_time: self.notification_time,
            last_notification: self.last_notification,
        }
    }
}

/// Parameters for linking a Discord account.
#[derive(Debug, Clone)]
pub struct ConnectDiscordParam {
    pub discord_user_id: String,
    pub channel_id: String,
}

impl ConnectDiscordParam {
    pub fn from_dto(dto: ConnectDiscordDto) -> Result<Self, ValidationError> {
        let discord_user_id = dto.discord_user_id.trim().to_string();
        let channel_id = dto.channel_id.trim().to_string();

        let mut v = Validator::new();
        v.check(
            !discord_user_id.is_empty(),
            "discordUserId",
            "Discord User ID is required",
        );
        v.check(!channel_id.is_empty(), "channelId", "Channel ID is required");
        v.finish()?;

        Ok(Self {
            discord_user_id,
            channel_id,
        })
    }
}

/// Parameters for subscribing to scheduled notifications.
#[derive(Debug, Clone)]
pub struct SubscribeParam {
    pub city: String,
    pub notification_time: Option<String>,
}

fn check_notification_time(time: &Option<String>, v: &mut Validator) {
    if let Some(time) = time {
        v.check(
            is_valid_notification_time(time),
            "notificationTime",
            "Notification time must be HH:MM",
        );
    }
}

impl SubscribeParam {
    /// Validates a subscription request. Coordinates must be present but are not stored.
    pub fn from_dto(dto: SubscribeDto) -> Result<Self, ValidationError> {
        let city = dto.city.trim().to_string();
        let notification_time = non_blank(dto.notification_time);

        let mut v = Validator::new();
        v.check(!city.is_empty(), "city", "City name is required");
        v.check(dto.lat.is_some(), "lat", "Latitude must be a number");
        v.check(dto.lon.is_some(), "lon", "Longitude must be a number");
        check_notification_time(&notification_time, &mut v);
        v.finish()?;

        Ok(Self {
            city,
            notification_time,
        })
    }

    /// Validates a notification city change.
    pub fn from_update_dto(dto: UpdateCityDto) -> Result<Self, ValidationError> {
        let city = dto.city.trim().to_string();
        let notification_time = non_blank(dto.notification_time);

        let mut v = Validator::new();
        v.check(!city.is_empty(), "city", "City name is required");
        check_notification_time(&notification_time, &mut v);
        v.finish()?;

        Ok(Self {
            city,
            notification_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_notification_time() {
        let err = SubscribeParam::from_dto(SubscribeDto {
            city: "Hanoi".to_string(),
            lat: Some(21.0),
            lon: Some(105.8),
            notification_time: Some("7am".to_string()),
        })
        .unwrap_err();

        assert_eq!(err.errors[0].field, "notificationTime");
    }

    #[test]
    fn reports_connection_status() {
        let link = DiscordLink {
            user_id: Some("1".to_string()),
            ..Default::default()
        };

        let status = link.into_status_dto();
        assert!(status.connected);
        assert!(!status.subscribed);
    }
}
