//! Favorite city factory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates a favorite city for a user at fixed coordinates.
///
/// # Arguments
/// - `db` - Database connection
/// - `user_id` - Owning user's ID
/// - `name` - City name
/// - `country` - Country code
///
/// # Returns
/// - `Ok(entity::favorite_city::Model)` - Created favorite
/// - `Err(DbErr)` - Database error during insert
pub async fn create_favorite(
    db: &DatabaseConnection,
    user_id: i32,
    name: &str,
    country: &str,
) -> Result<entity::favorite_city::Model, DbErr> {
    entity::favorite_city::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        name: ActiveValue::Set(name.to_string()),
        country: ActiveValue::Set(country.to_string()),
        lat: ActiveValue::Set(21.0285),
        lon: ActiveValue::Set(105.8542),
        added_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}
