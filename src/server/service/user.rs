//! User service for per-account data.
//!
//! This module provides the `UserService` for favorites, search history,
//! preferences and last location. It works with domain models and leaves DTO
//! conversion to the controllers.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::{
        favorite_city::FavoriteCityRepository, search_history::SearchHistoryRepository,
        user::UserRepository,
    },
    error::AppError,
    model::{
        favorite::{AddFavoriteOutcome, AddFavoriteParam, FavoriteCity},
        search_history::{AddSearchParam, SearchEntry},
        user::{LastLocationParam, UpdatePreferencesParam, User},
    },
};

/// Service providing business logic for a user's own data.
pub struct UserService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `UserService` - New service instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_favorites(&self, user_id: i32) -> Result<Vec<FavoriteCity>, AppError> {
        let favorites = FavoriteCityRepository::new(self.db)
            .get_by_user_id(user_id)
            .await?;
        Ok(favorites)
    }

    /// Adds a favorite city. Adding a `(name, country)` pair that is already
    /// present leaves the list unchanged.
    pub async fn add_favorite(
        &self,
        user_id: i32,
        param: AddFavoriteParam,
    ) -> Result<AddFavoriteOutcome, AppError> {
        let outcome = FavoriteCityRepository::new(self.db)
            .add(user_id, param)
            .await?;
        Ok(outcome)
    }

    pub async fn remove_favorite(
        &self,
        user_id: i32,
        favorite_id: i32,
    ) -> Result<Vec<FavoriteCity>, AppError> {
        let favorites = FavoriteCityRepository::new(self.db)
            .remove(user_id, favorite_id)
            .await?;
        Ok(favorites)
    }

    pub async fn get_search_history(&self, user_id: i32) -> Result<Vec<SearchEntry>, AppError> {
        let history = SearchHistoryRepository::new(self.db)
            .get_by_user_id(user_id)
            .await?;
        Ok(history)
    }

    /// Moves or inserts a search at the front of the history.
    pub async fn add_search(
        &self,
        user_id: i32,
        param: AddSearchParam,
    ) -> Result<Vec<SearchEntry>, AppError> {
        let history = SearchHistoryRepository::new(self.db)
            .push(user_id, param.city, param.country)
            .await?;
        Ok(history)
    }

    pub async fn clear_search_history(&self, user_id: i32) -> Result<(), AppError> {
        SearchHistoryRepository::new(self.db).clear(user_id).await?;
        Ok(())
    }

    /// Updates preferences.
    ///
    /// # Returns
    /// - `Ok(User)` - Updated user
    /// - `Err(AppError::NotFound)` - User deleted mid-request
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn update_preferences(
        &self,
        user_id: i32,
        param: UpdatePreferencesParam,
    ) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .update_preferences(user_id, param.temperature_unit, param.language)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_last_location(
        &self,
        user_id: i32,
        param: LastLocationParam,
    ) -> Result<User, AppError> {
        UserRepository::new(self.db)
            .update_last_location(user_id, param.lat, param.lon, param.city, param.country)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
