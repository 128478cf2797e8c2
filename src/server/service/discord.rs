//! Discord account linking and notification subscriptions.
//!
//! Subscribing, unsubscribing and changing the city all require a linked Discord
//! account. Changing the city additionally requires an active subscription.

use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::user::UserRepository,
    error::AppError,
    model::{
        discord::{ConnectDiscordParam, DiscordLink, SubscribeParam},
        user::User,
    },
};

pub struct DiscordService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DiscordService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Links a Discord account and channel to `user`.
    ///
    /// Relinking replaces the previous account and turns notifications off.
    pub async fn connect(
        &self,
        user: &User,
        param: ConnectDiscordParam,
    ) -> Result<DiscordLink, AppError> {
        let updated = UserRepository::new(self.db)
            .set_discord_link(user.id, param)
            .await?
            .ok_or_else(user_not_found)?;

        tracing::info!("User {} linked Discord account", user.id);

        Ok(updated.discord)
    }

    /// Subscribes `user` to scheduled notifications.
    ///
    /// # Returns
    /// - `Ok(DiscordLink)` - Updated link
    /// - `Err(AppError::BadRequest)` - No Discord account linked
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn subscribe(
        &self,
        user: &User,
        param: SubscribeParam,
    ) -> Result<DiscordLink, AppError> {
        if !user.discord.is_connected() {
            return Err(AppError::BadRequest(
                "Discord account not connected. Please connect your Discord account first."
                    .to_string(),
            ));
        }

        let updated = UserRepository::new(self.db)
            .subscribe(user.id, param)
            .await?
            .ok_or_else(user_not_found)?;

        Ok(updated.discord)
    }

    pub async fn unsubscribe(&self, user: &User) -> Result<DiscordLink, AppError> {
        require_connected(user)?;

        let updated = UserRepository::new(self.db)
            .unsubscribe(user.id)
            .await?
            .ok_or_else(user_not_found)?;

        Ok(updated.discord)
    }

    /// Changes the notification city, and optionally the delivery time.
    ///
    /// # Returns
    /// - `Ok(DiscordLink)` - Updated link
    /// - `Err(AppError::BadRequest)` - Not linked or not subscribed
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn update_city(
        &self,
        user: &User,
        param: SubscribeParam,
    ) -> Result<DiscordLink, AppError> {
        require_connected(user)?;
        if !user.discord.subscribed {
            return Err(AppError::BadRequest(
                "Not subscribed to notifications".to_string(),
            ));
        }

        let updated = UserRepository::new(self.db)
            .update_notification_city(user.id, param.city, param.notification_time)
            .await?
            .ok_or_else(user_not_found)?;

        Ok(updated.discord)
    }

    /// Links the invoking Discord account to the app user registered under `email`
    /// and subscribes them to hourly updates for `city`.
    ///
    /// # Returns
    /// - `Ok(Some(DiscordLink))` - Linked and subscribed
    /// - `Ok(None)` - No account uses that email
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn subscribe_by_email(
        &self,
        email: &str,
        link: ConnectDiscordParam,
        city: String,
    ) -> Result<Option<DiscordLink>, AppError> {
        let repo = UserRepository::new(self.db);
        let Some(user) = repo.find_by_email(&email.trim().to_lowercase()).await? else {
            return Ok(None);
        };

        repo.set_discord_link(user.id, link).await?;
        let updated = repo
            .subscribe(
                user.id,
                SubscribeParam {
                    city,
                    notification_time: None,
                },
            )
            .await?
            .ok_or_else(user_not_found)?;

        tracing::info!("User {} subscribed through the Discord bot", user.id);

        Ok(Some(updated.discord))
    }

    /// Unsubscribes the app user linked to a Discord account.
    ///
    /// # Returns
    /// - `Ok(true)` - Subscription removed
    /// - `Ok(false)` - No linked user, or the user was not subscribed
    pub async fn unsubscribe_by_discord_id(&self, discord_user_id: &str) -> Result<bool, AppError> {
        let repo = UserRepository::new(self.db);
        let user = repo.find_by_discord_user_id(discord_user_id).await?;

        match user {
            Some(user) if user.discord.subscribed => {
                repo.unsubscribe(user.id).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

fn require_connected(user: &User) -> Result<(), AppError> {
    if user.discord.is_connected() {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Discord account not connected".to_string(),
        ))
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{builder::TestBuilder, factory::user::UserFactory};

    fn subscribe_param(city: &str) -> SubscribeParam {
        SubscribeParam {
            city: city.to_string(),
            notification_time: Some("07:30".to_string()),
        }
    }

    /// Tests subscribing without a linked account.
    ///
    /// Expected: Err(AppError::BadRequest)
    #[tokio::test]
    async fn refuses_subscribe_without_link() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let user = User::from_entity(UserFactory::new(db).build().await?);

        let result = DiscordService::new(db)
            .subscribe(&user, subscribe_param("Hanoi"))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));

        Ok(())
    }

    /// Tests the connect, subscribe, unsubscribe cycle.
    ///
    /// Verifies that subscribing stores the city and time and that unsubscribing
    /// clears the city again.
    ///
    /// Expected: subscribed toggles true then false
    #[tokio::test]
    async fn toggles_subscription() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let user = User::from_entity(UserFactory::new(db).build().await?);
        let service = DiscordService::new(db);

        let link = service
            .connect(
                &user,
                ConnectDiscordParam {
                    discord_user_id: "111".to_string(),
                    channel_id: "222".to_string(),
                },
            )
            .await?;
        assert!(link.is_connected());
        assert!(!link.subscribed);

        let user = User {
            discord: link,
            ..user
        };
        let link = service.subscribe(&user, subscribe_param("Hanoi")).await?;
        assert!(link.subscribed);
        assert_eq!(link.notification_city.as_deref(), Some("Hanoi"));
        assert_eq!(link.notification_time.as_deref(), Some("07:30"));

        let user = User {
            discord: link,
            ..user
        };
        let link = service.unsubscribe(&user).await?;
        assert!(!link.subscribed);
        assert_eq!(link.notification_city, None);

        Ok(())
    }

    /// Tests changing the city while linked but not subscribed.
    ///
    /// Expected: Err(AppError::BadRequest)
    #[tokio::test]
    async fn refuses_city_update_when_not_subscribed() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let user = User::from_entity(UserFactory::new(db).discord("111", "222").build().await?);

        let result = DiscordService::new(db)
            .update_city(&user, subscribe_param("Da Nang"))
            .await;

        assert!(matches!(
            result,
            Err(AppError::BadRequest(msg)) if msg == "Not subscribed to notifications"
        ));

        Ok(())
    }

    /// Tests subscribing from the bot by email.
    ///
    /// Verifies that the email lookup ignores case, the invoker's ids are stored and
    /// the subscription has no delivery time (hourly).
    ///
    /// Expected: Some(link) for a known email, None otherwise
    #[tokio::test]
    async fn subscribes_by_email() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        UserFactory::new(db).email("linh@example.com").build().await?;
        let service = DiscordService::new(db);
        let link = || ConnectDiscordParam {
            discord_user_id: "111".to_string(),
            channel_id: "222".to_string(),
        };

        let stored = service
            .subscribe_by_email(" Linh@Example.com ", link(), "Hue".to_string())
            .await?
            .unwrap();
        assert!(stored.subscribed);
        assert_eq!(stored.user_id.as_deref(), Some("111"));
        assert_eq!(stored.channel_id.as_deref(), Some("222"));
        assert_eq!(stored.notification_city.as_deref(), Some("Hue"));
        assert_eq!(stored.notification_time, None);

        let missing = service
            .subscribe_by_email("nobody@example.com", link(), "Hue".to_string())
            .await?;
        assert!(missing.is_none());

        Ok(())
    }

    /// Tests unsubscribing from the bot by Discord id.
    ///
    /// Expected: true once, then false because the user is no longer subscribed
    #[tokio::test]
    async fn unsubscribes_by_discord_id() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        UserFactory::new(db)
            .discord("111", "222")
            .subscribed("Hanoi", None)
            .build()
            .await?;
        let service = DiscordService::new(db);

        assert!(service.unsubscribe_by_discord_id("111").await?);
        assert!(!service.unsubscribe_by_discord_id("111").await?);
        assert!(!service.unsubscribe_by_discord_id("999").await?);

        Ok(())
    }
}
