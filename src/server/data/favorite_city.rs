//! Favorite city repository.
//!
//! Favorites are child rows of a user, unique on `(user_id, name, country)` and
//! returned in the order they were added.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};

use crate::server::model::favorite::{AddFavoriteOutcome, AddFavoriteParam, FavoriteCity};

pub struct FavoriteCityRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FavoriteCityRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a user's favorites, oldest first.
    pub async fn get_by_user_id(&self, user_id: i32) -> Result<Vec<FavoriteCity>, DbErr> {
        let entities = entity::prelude::FavoriteCity::find()
            .filter(entity::favorite_city::Column::UserId.eq(user_id))
            .order_by_asc(entity::favorite_city::Column::AddedAt)
            .order_by_asc(entity::favorite_city::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(FavoriteCity::from_entity).collect())
    }

    /// Adds a city unless the same `(name, country)` pair is already present.
    ///
    /// # Returns
    /// - `Ok(AddFavoriteOutcome::Added(list))` - City inserted; updated list
    /// - `Ok(AddFavoriteOutcome::AlreadyPresent(list))` - Nothing changed; current list
    /// - `Err(DbErr)` - Database error during lookup or insert
    pub async fn add(
        &self,
        user_id: i32,
        param: AddFavoriteParam,
    ) -> Result<AddFavoriteOutcome, DbErr> {
        let existing = entity::prelude::FavoriteCity::find()
            .filter(entity::favorite_city::Column::UserId.eq(user_id))
            .filter(entity::favorite_city::Column::Name.eq(param.name.as_str()))
            .filter(entity::favorite_city::Column::Country.eq(param.country.as_str()))
            .count(self.db)
            .await?;

        if existing > 0 {
            let favorites = self.get_by_user_id(user_id).await?;
            return Ok(AddFavoriteOutcome::AlreadyPresent(favorites));
        }

        self.insert_new(user_id, param).await
    }

    /// Inserts a favorite the caller found absent.
    ///
    /// A concurrent add of the same city can win between the lookup and the insert;
    /// the unique index then rejects this insert and the outcome is `AlreadyPresent`.
    pub(super) async fn insert_new(
        &self,
        user_id: i32,
        param: AddFavoriteParam,
    ) -> Result<AddFavoriteOutcome, DbErr> {
        let inserted = entity::favorite_city::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(param.name),
            country: ActiveValue::Set(param.country),
            lat: ActiveValue::Set(param.lat),
            lon: ActiveValue::Set(param.lon),
            added_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await;

        match inserted {
            Ok(_) => {
                let favorites = self.get_by_user_id(user_id).await?;
                Ok(AddFavoriteOutcome::Added(favorites))
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                let favorites = self.get_by_user_id(user_id).await?;
                Ok(AddFavoriteOutcome::AlreadyPresent(favorites))
            }
            Err(err) => Err(err),
        }
    }

    /// Removes one of the user's favorites and returns the remaining list.
    ///
    /// Unknown IDs and IDs owned by other users are ignored.
    pub async fn remove(&self, user_id: i32, favorite_id: i32) -> Result<Vec<FavoriteCity>, DbErr> {
        entity::prelude::FavoriteCity::delete_many()
            .filter(entity::favorite_city::Column::Id.eq(favorite_id))
            .filter(entity::favorite_city::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        self.get_by_user_id(user_id).await
    }
}
