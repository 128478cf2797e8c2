//! Admin dashboard, moderation and analytics.
//!
//! Dashboard totals are cached for 30 seconds and metric series for 20 seconds.
//! Every moderation action writes an audit row; a failed audit write is logged
//! and does not undo the action.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use dioxus_logger::tracing;
use moka::future::{Cache, CacheBuilder};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::server::{
    data::{
        admin_audit::AdminAuditRepository, api_event::ApiEventRepository,
        favorite_city::FavoriteCityRepository, search_history::SearchHistoryRepository,
        user::UserRepository,
    },
    error::AppError,
    model::{
        admin::{
            AdminStats, BanAction, Metric, MetricPoint, MetricsParam,
            UserAnalytics,
        },
        admin_audit::{AuditAction, AuditFilterParam, NewAuditParam, PaginatedAudits},
        user::{PaginatedUsers, UpdateUserParam, User, UserFilterParam},
    },
};

const STATS_TTL: Duration = Duration::from_secs(30);
const METRICS_TTL: Duration = Duration::from_secs(20);
const TOP_CITIES: u64 = 5;
const ANALYTICS_LIST_LIMIT: usize = 20;

/// Short-lived caches for dashboard aggregates, shared through `AppState`.
#[derive(Clone)]
pub struct AdminCache {
    stats: Cache<(), AdminStats>,
    metrics: Cache<MetricsParam, Vec<MetricPoint>>,
}

impl AdminCache {
    pub fn new() -> Self {
        Self {
            stats: CacheBuilder::new(1).time_to_live(STATS_TTL).build(),
            metrics: CacheBuilder::new(256).time_to_live(METRICS_TTL).build(),
        }
    }
}

impl Default for AdminCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Start of the current local day, in UTC.
fn start_of_today() -> DateTime<Utc> {
    Local::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|midnight| midnight.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

pub struct AdminService<'a> {
    db: &'a DatabaseConnection,
    cache: &'a AdminCache,
}

impl<'a> AdminService<'a> {
    pub fn new(db: &'a DatabaseConnection, cache: &'a AdminCache) -> Self {
        Self { db, cache }
    }

    /// Gets dashboard totals.
    ///
    /// # Returns
    /// - `Ok((AdminStats, cached))` - `cached` is true when served from cache
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn stats(&self) -> Result<(AdminStats, bool), AppError> {
        if let Some(stats) = self.cache.stats.get(&()).await {
            tracing::debug!("Serving admin stats from cache");
            return Ok((stats, true));
        }

        let user_repo = UserRepository::new(self.db);
        let event_repo = ApiEventRepository::new(self.db);
        let today = start_of_today();

        let stats = AdminStats {
            users_count: user_repo.count().await?,
            banned_count: user_repo.count_banned().await?,
            active7d: user_repo
                .count_created_since(Utc::now() - chrono::Duration::days(7))
                .await?,
            events_today: event_repo.count_since(today).await?,
            total_events: event_repo.count().await?,
            discord_connections: user_repo.count_discord_connected().await?,
            discord_subscribed: user_repo.count_discord_subscribed().await?,
            top_cities: event_repo.top_search_queries_since(today, TOP_CITIES).await?,
        };

        self.cache.stats.insert((), stats.clone()).await;
        Ok((stats, false))
    }

    /// Gets a time-bucketed series for the last `param.days` days.
    ///
    /// # Returns
    /// - `Ok((Vec<MetricPoint>, cached))` - Buckets in ascending order
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn metrics(&self, param: MetricsParam) -> Result<(Vec<MetricPoint>, bool), AppError> {
        if let Some(points) = self.cache.metrics.get(&param).await {
            return Ok((points, true));
        }

        let since = Utc::now() - chrono::Duration::days(param.days);
        let points = match param.metric {
            Metric::NewUsers => {
                UserRepository::new(self.db)
                    .bucketed_signups_since(since, param.bucket)
                    .await?
            }
            metric => {
                ApiEventRepository::new(self.db)
                    .bucketed_counts_since(since, metric.event_action(), param.bucket)
                    .await?
            }
        };

        self.cache.metrics.insert(param, points.clone()).await;
        Ok((points, false))
    }

    pub async fn list_users(&self, filter: UserFilterParam) -> Result<PaginatedUsers, AppError> {
        let users = UserRepository::new(self.db).get_paginated(filter).await?;
        Ok(users)
    }

    pub async fn get_user(&self, id: i32) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(user_not_found)
    }

    /// Applies admin edits to an account and records `edit_user`.
    ///
    /// # Arguments
    /// - `admin` - Acting administrator
    /// - `id` - Target user ID
    /// - `param` - Fields to change
    /// - `ip` - Client address recorded in the audit log
    ///
    /// # Returns
    /// - `Ok(User)` - Updated user
    /// - `Err(AppError::NotFound)` - No user with that ID
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn update_user(
        &self,
        admin: &User,
        id: i32,
        param: UpdateUserParam,
        ip: Option<String>,
    ) -> Result<User, AppError> {
        let changes = param.changed_fields();
        let user = UserRepository::new(self.db)
            .update(id, param)
            .await?
            .ok_or_else(user_not_found)?;

        self.record_audit(NewAuditParam {
            admin_id: admin.id,
            action: AuditAction::EditUser,
            target_user_id: Some(user.id),
            target_email: Some(user.email.clone()),
            meta: Some(json!({ "changes": changes })),
            ip,
        })
        .await;

        Ok(user)
    }

    /// Bans or unbans an account and records `ban_user` or `unban_user`.
    pub async fn set_ban(
        &self,
        admin: &User,
        id: i32,
        action: BanAction,
        ip: Option<String>,
    ) -> Result<User, AppError> {
        let banned = action == BanAction::Ban;
        let user = UserRepository::new(self.db)
            .set_banned(id, banned)
            .await?
            .ok_or_else(user_not_found)?;

        tracing::info!(
            "Admin {} {} user {}",
            admin.id,
            if banned { "banned" } else { "unbanned" },
            user.id
        );

        self.record_audit(NewAuditParam {
            admin_id: admin.id,
            action: if banned {
                AuditAction::BanUser
            } else {
                AuditAction::UnbanUser
            },
            target_user_id: Some(user.id),
            target_email: Some(user.email.clone()),
            meta: Some(json!({})),
            ip,
        })
        .await;

        Ok(user)
    }

    /// Deletes an account with its favorites and history and records `delete_user`.
    pub async fn delete_user(
        &self,
        admin: &User,
        id: i32,
        ip: Option<String>,
    ) -> Result<User, AppError> {
        let user = UserRepository::new(self.db)
            .delete(id)
            .await?
            .ok_or_else(user_not_found)?;

        tracing::info!("Admin {} deleted user {}", admin.id, user.id);

        self.record_audit(NewAuditParam {
            admin_id: admin.id,
            action: AuditAction::DeleteUser,
            target_user_id: Some(user.id),
            target_email: Some(user.email.clone()),
            meta: Some(json!({ "email": user.email })),
            ip,
        })
        .await;

        Ok(user)
    }

    async fn record_audit(&self, param: NewAuditParam) {
        let action = param.action;
        if let Err(e) = AdminAuditRepository::new(self.db).create(param).await {
            tracing::warn!("Failed to log admin audit {}: {}", action.as_str(), e);
        }
    }

    /// Gets the audit log with admin and target accounts resolved where they
    /// still exist.
    pub async fn audit_log(&self, filter: AuditFilterParam) -> Result<PaginatedAudits, AppError> {
        let mut page = AdminAuditRepository::new(self.db)
            .get_paginated(filter)
            .await?;

        let mut ids: Vec<i32> = page
            .audits
            .iter()
            .flat_map(|a| std::iter::once(a.admin_id).chain(a.target_user_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let refs = UserRepository::new(self.db).get_refs(&ids).await?;
        for audit in &mut page.audits {
            audit.admin = refs.get(&audit.admin_id).cloned();
            audit.target_user = audit
                .target_user_id
                .and_then(|id| refs.get(&id).cloned());
        }

        Ok(page)
    }

    /// Summarizes an account's activity over the last 30 days.
    ///
    /// # Returns
    /// - `Ok(UserAnalytics)` - Summary
    /// - `Err(AppError::NotFound)` - No user with that ID
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn user_analytics(&self, id: i32) -> Result<UserAnalytics, AppError> {
        let user = self.get_user(id).await?;

        let now = Utc::now();
        let thirty_days_ago = now - chrono::Duration::days(30);
        let ten_days_ago = now - chrono::Duration::days(10);

        let event_repo = ApiEventRepository::new(self.db);
        let history_repo = SearchHistoryRepository::new(self.db);

        let user_events = event_repo.count_for_user_since(id, thirty_days_ago).await?;
        let activity_breakdown = event_repo
            .action_breakdown_for_user(id, thirty_days_ago)
            .await?;

        let mut searches = history_repo.get_by_user_id(id).await?;
        searches.truncate(ANALYTICS_LIST_LIMIT);
        let recent_searches = history_repo.get_by_user_id_since(id, ten_days_ago).await?;

        let mut favorites = FavoriteCityRepository::new(self.db)
            .get_by_user_id(id)
            .await?;
        favorites.truncate(ANALYTICS_LIST_LIMIT);

        Ok(UserAnalytics {
            user,
            user_events,
            searches,
            favorites,
            activity_breakdown,
            recent_searches,
        })
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{
        builder::TestBuilder,
        factory::{self, api_event::ApiEventFactory, user::UserFactory},
    };

    /// Tests that ban, unban and delete each leave an audit row.
    ///
    /// Verifies the action names, the target email and the delete meta.
    ///
    /// Expected: three audit rows, newest first
    #[tokio::test]
    async fn audits_moderation_actions() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let admin = User::from_entity(factory::create_admin(db).await?);
        let target = UserFactory::new(db).email("target@example.com").build().await?;
        let cache = AdminCache::new();
        let service = AdminService::new(db, &cache);

        let banned = service.set_ban(&admin, target.id, BanAction::Ban, None).await?;
        assert!(banned.banned);
        let unbanned = service
            .set_ban(&admin, target.id, BanAction::Unban, None)
            .await?;
        assert!(!unbanned.banned);
        service
            .delete_user(&admin, target.id, Some("127.0.0.1".to_string()))
            .await?;

        let log = service
            .audit_log(AuditFilterParam {
                admin_id: None,
                action: None,
                since: Utc::now() - chrono::Duration::days(1),
                page: 1,
                per_page: 50,
            })
            .await?;

        let actions: Vec<&str> = log.audits.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, vec!["delete_user", "unban_user", "ban_user"]);
        assert_eq!(log.audits[0].meta, Some(json!({ "email": "target@example.com" })));
        assert_eq!(log.audits[0].target_user, None);
        assert_eq!(
            log.audits[0].admin.as_ref().map(|a| a.email.as_str()),
            Some(admin.email.as_str())
        );

        Ok(())
    }

    /// Tests moderation of a user that does not exist.
    ///
    /// Expected: Err(AppError::NotFound)
    #[tokio::test]
    async fn reports_unknown_user() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let admin = User::from_entity(factory::create_admin(db).await?);
        let cache = AdminCache::new();

        let result = AdminService::new(db, &cache)
            .set_ban(&admin, 9999, BanAction::Ban, None)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));

        Ok(())
    }

    /// Tests that a second stats call within the TTL is served from cache.
    ///
    /// Expected: first call uncached, second cached with unchanged totals
    #[tokio::test]
    async fn caches_stats() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        factory::create_user(db).await?;
        ApiEventFactory::new(db)
            .action("search")
            .query("hanoi")
            .build()
            .await?;
        let cache = AdminCache::new();
        let service = AdminService::new(db, &cache);

        let (first, cached) = service.stats().await?;
        assert!(!cached);
        assert_eq!(first.users_count, 1);
        assert_eq!(first.top_cities, vec![("hanoi".to_string(), 1)]);

        factory::create_user(db).await?;
        let (second, cached) = service.stats().await?;
        assert!(cached);
        assert_eq!(second.users_count, 1);

        Ok(())
    }

    /// Tests the searches metric.
    ///
    /// Expected: one daily bucket counting only search events
    #[tokio::test]
    async fn counts_search_metric() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        ApiEventFactory::new(db).action("search").build().await?;
        ApiEventFactory::new(db).action("search").build().await?;
        ApiEventFactory::new(db).action("auth_me").build().await?;
        let cache = AdminCache::new();

        let param = MetricsParam::parse(Some("searches"), Some("1"), None)?;
        let (points, cached) = AdminService::new(db, &cache).metrics(param).await?;

        assert!(!cached);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].count, 2);

        Ok(())
    }
}
