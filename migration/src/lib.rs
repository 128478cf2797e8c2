pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_user_table;
mod m20260101_000002_create_favorite_city_table;
mod m20260101_000003_create_search_history_table;
mod m20260101_000004_create_api_event_table;
mod m20260101_000005_create_admin_audit_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_user_table::Migration),
            Box::new(m20260101_000002_create_favorite_city_table::Migration),
            Box::new(m20260101_000003_create_search_history_table::Migration),
            Box::new(m20260101_000004_create_api_event_table::Migration),
            Box::new(m20260101_000005_create_admin_audit_table::Migration),
        ]
    }
}
