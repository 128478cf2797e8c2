//! Usage telemetry repository.
//!
//! Aggregations group and count in SQL. Time buckets use SQLite's `strftime`.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, ExprTrait}, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::{
    admin::{Bucket, MetricPoint},
    api_event::{ActionCount, NewApiEventParam},
};

pub struct ApiEventRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ApiEventRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts an event stamped with the current time.
    pub async fn create(&self, param: NewApiEventParam) -> Result<(), DbErr> {
        entity::api_event::ActiveModel {
            event_type: ActiveValue::Set(param.event_type),
            user_id: ActiveValue::Set(param.user_id),
            action: ActiveValue::Set(param.action),
            query: ActiveValue::Set(param.query),
            meta: ActiveValue::Set(param.meta),
            ip: ActiveValue::Set(param.ip),
            ts: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;
        Ok(())
    }

    /// Counts all events.
    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::ApiEvent::find().count(self.db).await
    }

    /// Counts events at or after `since`.
    pub async fn count_since(&self, since: DateTime<Utc>) -> Result<u64, DbErr> {
        entity::prelude::ApiEvent::find()
            .filter(entity::api_event::Column::Ts.gte(since))
            .count(self.db)
            .await
    }

    /// Counts one user's events at or after `since`.
    pub async fn count_for_user_since(
        &self,
        user_id: i32,
        since: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        entity::prelude::ApiEvent::find()
            .filter(entity::api_event::Column::UserId.eq(user_id))
            .filter(entity::api_event::Column::Ts.gte(since))
            .count(self.db)
            .await
    }

    /// Gets the most frequent search queries at or after `since`.
    ///
    /// # Arguments
    /// - `since` - Lower bound on the event timestamp
    /// - `limit` - Maximum number of queries returned
    ///
    /// # Returns
    /// - `Ok(Vec<(query, count)>)` - Ordered by count descending, then query ascending
    /// - `Err(DbErr)` - Database error during query
    pub async fn top_search_queries_since(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<(String, u64)>, DbErr> {
        let count = Expr::col(entity::api_event::Column::Id).count();
        let rows = entity::prelude::ApiEvent::find()
            .select_only()
            .column(entity::api_event::Column::Query)
            .column_as(count.clone(), "count")
            .filter(entity::api_event::Column::Action.eq("search"))
            .filter(entity::api_event::Column::Query.is_not_null())
            .filter(entity::api_event::Column::Ts.gte(since))
            .group_by(entity::api_event::Column::Query)
            .order_by_desc(count)
            .order_by_asc(entity::api_event::Column::Query)
            .limit(limit)
            .into_tuple::<(String, i64)>()
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(query, count)| (query, count as u64))
            .collect())
    }

    /// Counts events per time bucket at or after `since`, optionally for a single
    /// action. Buckets are ascending; empty buckets are omitted.
    pub async fn bucketed_counts_since(
        &self,
        since: DateTime<Utc>,
        action: Option<&str>,
        bucket: Bucket,
    ) -> Result<Vec<MetricPoint>, DbErr> {
        let label = bucket.sql_label("ts");
        let mut query = entity::prelude::ApiEvent::find()
            .select_only()
            .column_as(label.clone(), "bucket")
            .column_as(Expr::col(entity::api_event::Column::Id).count(), "count")
            .filter(entity::api_event::Column::Ts.gte(since));
        if let Some(action) = action {
            query = query.filter(entity::api_event::Column::Action.eq(action));
        }

        let rows = query
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

    /// Counts one user's events per action at or after `since`, most frequent first.
    pub async fn action_breakdown_for_user(
        &self,
        user_id: i32,
        since: DateTime<Utc>,
    ) -> Result<Vec<ActionCount>, DbErr> {
        let count = Expr::col(entity::api_event::Column::Id).count();
        let rows = entity::prelude::ApiEvent::find()
            .select_only()
            .column(entity::api_event::Column::Action)
            .column_as(count.clone(), "count")
            .filter(entity::api_event::Column::UserId.eq(user_id))
            .filter(entity::api_event::Column::Ts.gte(since))
            .group_by(entity::api_event::Column::Action)
            .order_by_desc(count)
            .order_by_asc(entity::api_event::Column::Action)
            .into_tuple::<(Option<String>, i64)>()
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(action, count)| ActionCount {
                action,
                count: count as u64,
            })
            .collect())
    }
}
