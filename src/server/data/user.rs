//! User data repository for database operations.
//!
//! This module provides the `UserRepository` for managing account rows: creation at
//! registration, lookups by the various login identities, preference and location
//! updates, the embedded Discord link, and the admin listing and moderation queries.
//! Entity models are converted to domain models at this boundary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, ExprTrait, LikeExpr},
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::{
    admin::{Bucket, MetricPoint},
    admin_audit::UserRef,
    discord::{ConnectDiscordParam, SubscribeParam},
    user::{
        CreateUserParam, PaginatedUsers, UpdateUserParam, User, UserFilterParam, UserStatusFilter,
    },
};

/// Escapes LIKE wildcards so user input matches literally under `ESCAPE '\'`.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Repository providing database operations for user accounts.
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new account with default preferences and no Discord link.
    ///
    /// # Arguments
    /// - `param` - Validated registration data with the password already hashed
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(DbErr)` - Database error, including unique constraint violations
    pub async fn create(&self, param: CreateUserParam) -> Result<User, DbErr> {
        let now = Utc::now();
        let search_text = entity::user::search_text(
            &param.username,
            &param.email,
            param.full_name.as_deref(),
        );
        let entity = entity::user::ActiveModel {
            username: ActiveValue::Set(param.username),
            email: ActiveValue::Set(param.email),
            password_hash: ActiveValue::Set(param.password_hash),
            cccd: ActiveValue::Set(param.cccd),
            date_of_birth: ActiveValue::Set(param.date_of_birth),
            gender: ActiveValue::Set(param.gender),
            address: ActiveValue::Set(param.address),
            full_name: ActiveValue::Set(param.full_name),
            search_text: ActiveValue::Set(search_text),
            phone_number: ActiveValue::Set(None),
            is_verified: ActiveValue::Set(false),
            banned: ActiveValue::Set(false),
            role: ActiveValue::Set("user".to_string()),
            temperature_unit: ActiveValue::Set("celsius".to_string()),
            language: ActiveValue::Set("en".to_string()),
            last_lat: ActiveValue::Set(None),
            last_lon: ActiveValue::Set(None),
            last_city: ActiveValue::Set(None),
            last_country: ActiveValue::Set(None),
            last_location_at: ActiveValue::Set(None),
            discord_user_id: ActiveValue::Set(None),
            discord_channel_id: ActiveValue::Set(None),
            discord_subscribed: ActiveValue::Set(false),
            discord_notification_city: ActiveValue::Set(None),
            discord_notification_time: ActiveValue::Set(None),
            discord_last_notification: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(User::from_entity(entity))
    }

    /// Finds a user by primary key.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User found
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find_by_id(id).one(self.db).await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user by email. The caller passes the normalized (lowercased) form.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user by CCCD number.
    pub async fn find_by_cccd(&self, cccd: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Cccd.eq(cccd))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds the user linked to a Discord account.
    pub async fn find_by_discord_user_id(
        &self,
        discord_user_id: &str,
    ) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::DiscordUserId.eq(discord_user_id))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Checks whether any account already uses one of the given identities.
    ///
    /// # Arguments
    /// - `email` - Normalized email
    /// - `username` - Username
    /// - `cccd` - Optional CCCD number; ignored when `None`
    ///
    /// # Returns
    /// - `Ok(true)` - At least one identity is taken
    /// - `Ok(false)` - All identities are free
    /// - `Err(DbErr)` - Database error during count query
    pub async fn identity_taken(
        &self,
        email: &str,
        username: &str,
        cccd: Option<&str>,
    ) -> Result<bool, DbErr> {
        let mut condition = Condition::any()
            .add(entity::user::Column::Email.eq(email))
            .add(entity::user::Column::Username.eq(username));
        if let Some(cccd) = cccd {
            condition = condition.add(entity::user::Column::Cccd.eq(cccd));
        }

        let count = entity::prelude::User::find()
            .filter(condition)
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Loads a user row, applies `apply` to it, bumps `updated_at` and saves it.
    ///
    /// Returns `Ok(None)` when the user does not exist.
    async fn update_by_id<F>(&self, id: i32, apply: F) -> Result<Option<User>, DbErr>
    where
        F: FnOnce(&mut entity::user::ActiveModel),
    {
        let Some(entity) = entity::prelude::User::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active: entity::user::ActiveModel = entity.into();
        apply(&mut active);
        active.updated_at = ActiveValue::Set(Utc::now());
        let updated = active.update(self.db).await?;

        Ok(Some(User::from_entity(updated)))
    }

    /// Updates display preferences. `None` leaves a field unchanged.
    pub async fn update_preferences(
        &self,
        id: i32,
        temperature_unit: Option<String>,
        language: Option<String>,
    ) -> Result<Option<User>, DbErr> {
        self.update_by_id(id, |user| {
            if let Some(unit) = temperature_unit {
                user.temperature_unit = ActiveValue::Set(unit);
            }
            if let Some(language) = language {
                user.language = ActiveValue::Set(language);
            }
        })
        .await
    }

    /// Replaces the stored last location, stamping it with the current time.
    pub async fn update_last_location(
        &self,
        id: i32,
        lat: f64,
        lon: f64,
        city: String,
        country: String,
    ) -> Result<Option<User>, DbErr> {
        self.update_by_id(id, |user| {
            user.last_lat = ActiveValue::Set(Some(lat));
            user.last_lon = ActiveValue::Set(Some(lon));
            user.last_city = ActiveValue::Set(Some(city));
            user.last_country = ActiveValue::Set(Some(country));
            user.last_location_at = ActiveValue::Set(Some(Utc::now()));
        })
        .await
    }

    /// Stores the Discord account and channel. Any existing subscription is turned off.
    pub async fn set_discord_link(
        &self,
        id: i32,
        param: ConnectDiscordParam,
    ) -> Result<Option<User>, DbErr> {
        self.update_by_id(id, |user| {
            user.discord_user_id = ActiveValue::Set(Some(param.discord_user_id));
            user.discord_channel_id = ActiveValue::Set(Some(param.channel_id));
            user.discord_subscribed = ActiveValue::Set(false);
        })
        .await
    }

    /// Turns notifications on for a city and clears the last delivery timestamp.
    pub async fn subscribe(&self, id: i32, param: SubscribeParam) -> Result<Option<User>, DbErr> {
        self.update_by_id(id, |user| {
            user.discord_subscribed = ActiveValue::Set(true);
            user.discord_notification_city = ActiveValue::Set(Some(param.city));
            user.discord_notification_time = ActiveValue::Set(param.notification_time);
            user.discord_last_notification = ActiveValue::Set(None);
        })
        .await
    }

    /// Turns notifications off and clears the notification city and time.
    pub async fn unsubscribe(&self, id: i32) -> Result<Option<User>, DbErr> {
        self.update_by_id(id, |user| {
            user.discord_subscribed = ActiveValue::Set(false);
            user.discord_notification_city = ActiveValue::Set(None);
            user.discord_notification_time = ActiveValue::Set(None);
        })
        .await
    }

    /// Changes the notification city, and the delivery time when one is given.
    pub async fn update_notification_city(
        &self,
        id: i32,
        city: String,
        notification_time: Option<String>,
    ) -> Result<Option<User>, DbErr> {
        self.update_by_id(id, |user| {
            user.discord_notification_city = ActiveValue::Set(Some(city));
            if let Some(time) = notification_time {
                user.discord_notification_time = ActiveValue::Set(Some(time));
            }
        })
        .await
    }

    /// Records a notification delivery.
    pub async fn mark_notified(&self, id: i32, at: DateTime<Utc>) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(
                entity::user::Column::DiscordLastNotification,
                Expr::value(at),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Gets every subscribed user that has both a channel and a notification city.
    pub async fn get_subscribed(&self) -> Result<Vec<User>, DbErr> {
        let entities = entity::prelude::User::find()
            .filter(entity::user::Column::DiscordSubscribed.eq(true))
            .filter(entity::user::Column::DiscordChannelId.is_not_null())
            .filter(entity::user::Column::DiscordNotificationCity.is_not_null())
            .order_by_asc(entity::user::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(User::from_entity).collect())
    }

    /// Gets users for the admin list, newest first.
    ///
    /// `q` matches case-insensitively against username, email and full name,
    /// including non-ASCII letters. `%` and `_` in `q` match literally.
    /// Pages are one-based.
    pub async fn get_paginated(&self, filter: UserFilterParam) -> Result<PaginatedUsers, DbErr> {
        let mut query = entity::prelude::User::find();

        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let pattern = format!("%{}%", escape_like(&q.to_lowercase()));
            query = query.filter(
                entity::user::Column::SearchText.like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        match filter.status {
            Some(UserStatusFilter::Banned) => {
                query = query.filter(entity::user::Column::Banned.eq(true))
            }
            Some(UserStatusFilter::Active) => {
                query = query.filter(entity::user::Column::Banned.eq(false))
            }
            None => {}
        }

        let paginator = query
            .order_by_desc(entity::user::Column::CreatedAt)
            .order_by_desc(entity::user::Column::Id)
            .paginate(self.db, filter.per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(filter.page.saturating_sub(1)).await?;

        Ok(PaginatedUsers {
            users: entities.into_iter().map(User::from_entity).collect(),
            total,
            page: filter.page,
            per_page: filter.per_page,
        })
    }

    /// Applies admin edits to an account.
    pub async fn update(&self, id: i32, param: UpdateUserParam) -> Result<Option<User>, DbErr> {
        self.update_by_id(id, |user| {
            if let Some(full_name) = param.full_name {
                user.full_name = ActiveValue::Set(Some(full_name));
            }
            if let Some(email) = param.email {
                user.email = ActiveValue::Set(email);
            }
            let search_text = entity::user::search_text(
                user.username.as_ref(),
                user.email.as_ref(),
                user.full_name.as_ref().as_deref(),
            );
            user.search_text = ActiveValue::Set(search_text);
            if let Some(is_verified) = param.is_verified {
                user.is_verified = ActiveValue::Set(is_verified);
            }
            if let Some(unit) = param.temperature_unit {
                user.temperature_unit = ActiveValue::Set(unit);
            }
            if let Some(language) = param.language {
                user.language = ActiveValue::Set(language);
            }
        })
        .await
    }

    /// Sets the banned flag.
    pub async fn set_banned(&self, id: i32, banned: bool) -> Result<Option<User>, DbErr> {
        self.update_by_id(id, |user| {
            user.banned = ActiveValue::Set(banned);
        })
        .await
    }

    /// Deletes an account and, through cascading keys, its favorites and history.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - The user as it was before deletion
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, id: i32) -> Result<Option<User>, DbErr> {
        let Some(entity) = entity::prelude::User::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        entity::prelude::User::delete_by_id(id).exec(self.db).await?;

        Ok(Some(User::from_entity(entity)))
    }

    /// Counts all users.
    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::User::find().count(self.db).await
    }

    /// Counts banned users.
    pub async fn count_banned(&self) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Banned.eq(true))
            .count(self.db)
            .await
    }

    /// Counts users created at or after `since`.
    pub async fn count_created_since(&self, since: DateTime<Utc>) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::CreatedAt.gte(since))
            .count(self.db)
            .await
    }

    /// Counts users with a linked Discord account.
    pub async fn count_discord_connected(&self) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::DiscordUserId.is_not_null())
            .count(self.db)
            .await
    }

    /// Counts users subscribed to Discord notifications.
    pub async fn count_discord_subscribed(&self) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::DiscordSubscribed.eq(true))
            .count(self.db)
            .await
    }

    /// Counts accounts created per time bucket at or after `since`, ascending.
    pub async fn bucketed_signups_since(
        &self,
        since: DateTime<Utc>,
        bucket: Bucket,
    ) -> Result<Vec<MetricPoint>, DbErr> {
        let label = bucket.sql_label("created_at");
        let rows = entity::prelude::User::find()
            .select_only()
            .column_as(label.clone(), "bucket")
            .column_as(Expr::col(entity::user::Column::Id).count(), "count")
            .filter(entity::user::Column::CreatedAt.gte(since))
            .group_by(label.clone())
            .order_by_asc(label)
            .into_tuple::<(String, i64)>()
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(bucket, count)| MetricPoint {
                bucket,
                count: count as u64,
            })
            .collect())
    }

    /// Resolves username and email for a set of user IDs. Missing users are absent
    /// from the map.
    pub async fn get_refs(&self, ids: &[i32]) -> Result<HashMap<i32, UserRef>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let entities = entity::prelude::User::find()
            .filter(entity::user::Column::Id.is_in(ids.to_vec()))
            .all(self.db)
            .await?;

        Ok(entities
            .into_iter()
            .map(|user| {
                (
                    user.id,
                    UserRef {
                        username: user.username,
                        email: user.email,
                    },
                )
            })
            .collect())
    }
}
