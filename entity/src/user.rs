use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    #[sea_orm(unique)]
    pub cccd: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub full_name: Option<String>,
    /// Lowercased username, email and full name for admin search.
    pub search_text: String,
    pub phone_number: Option<String>,
    pub is_verified: bool,
    pub banned: bool,
    pub role: String,
    pub temperature_unit: String,
    pub language: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub last_lat: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub last_lon: Option<f64>,
    pub last_city: Option<String>,
    pub last_country: Option<String>,
    pub last_location_at: Option<DateTimeUtc>,
    pub discord_user_id: Option<String>,
    pub discord_channel_id: Option<String>,
    pub discord_subscribed: bool,
    pub discord_notification_city: Option<String>,
    pub discord_notification_time: Option<String>,
    pub discord_last_notification: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::favorite_city::Entity")]
    FavoriteCity,
    #[sea_orm(has_many = "super::search_history::Entity")]
    SearchHistory,
}

impl Related<super::favorite_city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteCity.def()
    }
}

impl Related<super::search_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SearchHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Builds the `search_text` value. Lowercased in Rust; SQLite's `LOWER` folds ASCII only.
pub fn search_text(username: &str, email: &str, full_name: Option<&str>) -> String {
    [username, email, full_name.unwrap_or_default()]
        .join("\n")
        .to_lowercase()
}
