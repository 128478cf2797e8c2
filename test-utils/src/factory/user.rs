//! User factory for creating test user entities.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user::UserFactory;
///
/// let user = UserFactory::new(&db)
///     .username("alice")
///     .email("alice@example.com")
///     .admin(true)
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    username: String,
    email: String,
    password_hash: String,
    cccd: Option<String>,
    full_name: Option<String>,
    role: String,
    banned: bool,
    discord_user_id: Option<String>,
    discord_channel_id: Option<String>,
    discord_subscribed: bool,
    discord_notification_city: Option<String>,
    discord_notification_time: Option<String>,
    discord_last_notification: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - username: `"user_{id}"` where id is auto-incremented
    /// - email: `"user_{id}@example.com"`
    /// - role: `"user"`, not banned, no Discord link
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            username: format!("user_{}", id),
            email: format!("user_{}@example.com", id),
            password_hash: "not-a-real-hash".to_string(),
            cccd: None,
            full_name: None,
            role: "user".to_string(),
            banned: false,
            discord_user_id: None,
            discord_channel_id: None,
            discord_subscribed: false,
            discord_notification_city: None,
            discord_notification_time: None,
            discord_last_notification: None,
            created_at: Utc::now(),
        }
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    pub fn cccd(mut self, cccd: impl Into<String>) -> Self {
        self.cccd = Some(cccd.into());
        self
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Sets the role to `admin` when `admin` is true.
    pub fn admin(mut self, admin: bool) -> Self {
        self.role = if admin { "admin" } else { "user" }.to_string();
        self
    }

    pub fn banned(mut self, banned: bool) -> Self {
        self.banned = banned;
        self
    }

    /// Links a Discord account and channel without subscribing.
    pub fn discord(mut self, user_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        self.discord_user_id = Some(user_id.into());
        self.discord_channel_id = Some(channel_id.into());
        self
    }

    /// Subscribes the user to notifications for `city` at the optional `HH:MM` time.
    pub fn subscribed(mut self, city: impl Into<String>, time: Option<&str>) -> Self {
        self.discord_subscribed = true;
        self.discord_notification_city = Some(city.into());
        self.discord_notification_time = time.map(str::to_string);
        self
    }

    pub fn last_notification(mut self, at: DateTime<Utc>) -> Self {
        self.discord_last_notification = Some(at);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Builds and inserts the user entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        let search_text =
            entity::user::search_text(&self.username, &self.email, self.full_name.as_deref());
        entity::user::ActiveModel {
            username: ActiveValue::Set(self.username),
            email: ActiveValue::Set(self.email),
            password_hash: ActiveValue::Set(self.password_hash),
            cccd: ActiveValue::Set(self.cccd),
            date_of_birth: ActiveValue::Set(None),
            gender: ActiveValue::Set(None),
            address: ActiveValue::Set(None),
            full_name: ActiveValue::Set(self.full_name),
            search_text: ActiveValue::Set(search_text),
            phone_number: ActiveValue::Set(None),
            is_verified: ActiveValue::Set(false),
            banned: ActiveValue::Set(self.banned),
            role: ActiveValue::Set(self.role),
            temperature_unit: ActiveValue::Set("celsius".to_string()),
            language: ActiveValue::Set("en".to_string()),
            last_lat: ActiveValue::Set(None),
            last_lon: ActiveValue::Set(None),
            last_city: ActiveValue::Set(None),
            last_country: ActiveValue::Set(None),
            last_location_at: ActiveValue::Set(None),
            discord_user_id: ActiveValue::Set(self.discord_user_id),
            discord_channel_id: ActiveValue::Set(self.discord_channel_id),
            discord_subscribed: ActiveValue::Set(self.discord_subscribed),
            discord_notification_city: ActiveValue::Set(self.discord_notification_city),
            discord_notification_time: ActiveValue::Set(self.discord_notification_time),
            discord_last_notification: ActiveValue::Set(self.discord_last_notification),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a user with default values.
///
/// Shorthand for `UserFactory::new(db).build().await`.
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}

/// Creates an admin user with default values.
pub async fn create_admin(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).admin(true).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_user_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(User).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let user = create_user(db).await?;

        assert!(user.username.starts_with("user_"));
        assert!(user.email.ends_with("@example.com"));
        assert_eq!(user.role, "user");
        assert!(!user.banned);
        assert!(!user.discord_subscribed);

        Ok(())
    }

    #[tokio::test]
    async fn creates_user_with_custom_values() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(User).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let user = UserFactory::new(db)
            .username("alice")
            .email("alice@example.com")
            .admin(true)
            .discord("111", "222")
            .subscribed("Hanoi", Some("07:30"))
            .build()
            .await?;

        assert_eq!(user.username, "alice");
        assert_eq!(user.role, "admin");
        assert_eq!(user.discord_channel_id.as_deref(), Some("222"));
        assert_eq!(user.discord_notification_time.as_deref(), Some("07:30"));
        assert!(user.discord_subscribed);

        Ok(())
    }

    #[tokio::test]
    async fn creates_multiple_unique_users() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(User).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let user1 = create_user(db).await?;
        let user2 = create_user(db).await?;

        assert_ne!(user1.username, user2.username);
        assert_ne!(user1.email, user2.email);

        Ok(())
    }
}
