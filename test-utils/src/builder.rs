use entity::prelude::*;
use sea_orm::{
    sea_query::{Index, TableCreateStatement},
    EntityTrait, Schema,
};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Add entity tables with `with_table()` (or one of the grouped helpers), then call
/// `build()` to create the in-memory database.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{User, FavoriteCity};
///
/// let test = TestBuilder::new()
///     .with_table(User)
///     .with_table(FavoriteCity)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Tables with foreign keys should be added after the tables they reference.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity to create a table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the user table together with its favorites and search history tables.
    ///
    /// Favorites carry the same `(user_id, name, country)` unique index as the migration.
    pub fn with_user_tables(mut self) -> Self {
        self = self.with_table(User);

        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        let mut favorites = schema.create_table_from_entity(FavoriteCity);
        favorites.index(
            Index::create()
                .unique()
                .name("idx_favorite_city_unique")
                .col(entity::favorite_city::Column::UserId)
                .col(entity::favorite_city::Column::Name)
                .col(entity::favorite_city::Column::Country),
        );
        self.tables.push(favorites);

        self.with_table(SearchHistory)
    }

    /// Adds every table in the schema, including telemetry and audit tables.
    ///
    /// Use this for admin analytics tests that read across all tables.
    pub fn with_all_tables(self) -> Self {
        self.with_user_tables()
            .with_table(ApiEvent)
            .with_table(AdminAudit)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Test context with database and tables ready
    /// - `Err(TestError::Database)` - Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
