//! Search history repository.
//!
//! Each user keeps at most [`SEARCH_HISTORY_LIMIT`] entries, newest first, with no
//! repeated `(city, country)` pair.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::search_history::{SearchEntry, SEARCH_HISTORY_LIMIT};

pub struct SearchHistoryRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SearchHistoryRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a user's history, most recent first.
    pub async fn get_by_user_id(&self, user_id: i32) -> Result<Vec<SearchEntry>, DbErr> {
        let entities = entity::prelude::SearchHistory::find()
            .filter(entity::search_history::Column::UserId.eq(user_id))
            .order_by_desc(entity::search_history::Column::SearchedAt)
            .order_by_desc(entity::search_history::Column::Id)
            .limit(SEARCH_HISTORY_LIMIT)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(SearchEntry::from_entity).collect())
    }

    /// Gets a user's searches made at or after `since`, most recent first.
    pub async fn get_by_user_id_since(
        &self,
        user_id: i32,
        since: DateTime<Utc>,
    ) -> Result<Vec<SearchEntry>, DbErr> {
        let entities = entity::prelude::SearchHistory::find()
            .filter(entity::search_history::Column::UserId.eq(user_id))
            .filter(entity::search_history::Column::SearchedAt.gte(since))
            .order_by_desc(entity::search_history::Column::SearchedAt)
            .order_by_desc(entity::search_history::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(SearchEntry::from_entity).collect())
    }

    /// Records a search at the front of the user's history.
    ///
    /// An earlier entry for the same `(city, country)` is removed first, and entries
    /// beyond the limit are pruned oldest first.
    ///
    /// # Returns
    /// - `Ok(Vec<SearchEntry>)` - Updated history, most recent first
    /// - `Err(DbErr)` - Database error during delete, insert or prune
    pub async fn push(
        &self,
        user_id: i32,
        city: String,
        country: String,
    ) -> Result<Vec<SearchEntry>, DbErr> {
        entity::prelude::SearchHistory::delete_many()
            .filter(entity::search_history::Column::UserId.eq(user_id))
            .filter(entity::search_history::Column::City.eq(city.as_str()))
            .filter(entity::search_history::Column::Country.eq(country.as_str()))
            .exec(self.db)
            .await?;

        entity::search_history::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            city: ActiveValue::Set(city),
            country: ActiveValue::Set(country),
            searched_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        let ids: Vec<i32> = entity::prelude::SearchHistory::find()
            .select_only()
            .column(entity::search_history::Column::Id)
            .filter(entity::search_history::Column::UserId.eq(user_id))
            .order_by_desc(entity::search_history::Column::SearchedAt)
            .order_by_desc(entity::search_history::Column::Id)
            .into_tuple::<i32>()
            .all(self.db)
            .await?;
        let overflow: Vec<i32> = ids
            .into_iter()
            .skip(SEARCH_HISTORY_LIMIT as usize)
            .collect();

        if !overflow.is_empty() {
            entity::prelude::SearchHistory::delete_many()
                .filter(entity::search_history::Column::Id.is_in(overflow))
                .exec(self.db)
                .await?;
        }

        self.get_by_user_id(user_id).await
    }

    /// Removes every history entry for a user.
    pub async fn clear(&self, user_id: i32) -> Result<(), DbErr> {
        entity::prelude::SearchHistory::delete_many()
            .filter(entity::search_history::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(())
    }
}
