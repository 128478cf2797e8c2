//! Search history factory.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates a search history entry stamped with the current time.
pub async fn create_search_entry(
    db: &DatabaseConnection,
    user_id: i32,
    city: &str,
    country: &str,
) -> Result<entity::search_history::Model, DbErr> {
    create_search_entry_at(db, user_id, city, country, Utc::now()).await
}

/// Creates a search history entry with an explicit timestamp.
pub async fn create_search_entry_at(
    db: &DatabaseConnection,
    user_id: i32,
    city: &str,
    country: &str,
    searched_at: DateTime<Utc>,
) -> Result<entity::search_history::Model, DbErr> {
    entity::search_history::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        city: ActiveValue::Set(city.to_string()),
        country: ActiveValue::Set(country.to_string()),
        searched_at: ActiveValue::Set(searched_at),
        ..Default::default()
    }
    .insert(db)
    .await
}
