use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use utoipa::ToSchema;

use crate::model::{
    discord::DiscordLinkDto,
    user::{FavoriteCityDto, PreferencesDto, SearchHistoryEntryDto, UpdatePreferencesDto},
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct TopQueryDto {
    pub query: String,
    pub count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsDto {
    pub cached: bool,
    pub users_count: u64,
    pub banned_count: u64,
    /// Accounts created during the last seven days.
    pub active7d: u64,
    pub events_today: u64,
    pub total_events: u64,
    pub discord_connections: u64,
    pub discord_subscribed: u64,
    pub top_cities: Vec<TopQueryDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct MetricPointDto {
    pub bucket: String,
    pub count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct MetricsResponseDto {
    pub cached: bool,
    pub data: Vec<MetricPointDto>,
}

/// Full account view for moderators. Never includes the password hash.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AdminUserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub cccd: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub is_verified: bool,
    pub banned: bool,
    pub role: String,
    pub preferences: PreferencesDto,
    pub discord: DiscordLinkDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserListDto {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub users: Vec<AdminUserDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct AdminUserDetailDto {
    pub user: AdminUserDto,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct AdminUserResponseDto {
    pub message: String,
    pub user: AdminUserDto,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub is_verified: Option<bool>,
    pub preferences: Option<UpdatePreferencesDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct BanUserDto {
    /// `ban` or `unban`.
    #[serde(default)]
    pub action: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct UserRefDto {
    pub username: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AuditEntryDto {
    pub id: i32,
    pub admin_id: i32,
    pub admin: Option<UserRefDto>,
    pub action: String,
    pub target_user_id: Option<i32>,
    pub target_user: Option<UserRefDto>,
    pub target_email: Option<String>,
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub meta: Option<serde_json::Value>,
    pub ip: Option<String>,
    pub ts: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AuditListDto {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub audits: Vec<AuditEntryDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct ActionCountDto {
    pub action: Option<String>,
    pub count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserAnalyticsDto {
    pub user: AdminUserDto,
    /// API calls made by the user during the last 30 days.
    pub user_events: u64,
    pub searches: Vec<SearchHistoryEntryDto>,
    pub favorites: Vec<FavoriteCityDto>,
    pub activity_breakdown: Vec<ActionCountDto>,
    pub recent_searches: Vec<SearchHistoryEntryDto>,
}
