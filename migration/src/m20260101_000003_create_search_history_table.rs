use sea_orm_migration::{prelude::*, schema::*};

use super::m20260101_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SearchHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(SearchHistory::Id))
                    .col(integer(SearchHistory::UserId))
                    .col(string(SearchHistory::City))
                    .col(string(SearchHistory::Country))
                    .col(
                        timestamp(SearchHistory::SearchedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_search_history_user_id")
                            .from(SearchHistory::Table, SearchHistory::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_search_history_user_searched_at")
                    .table(SearchHistory::Table)
                    .col(SearchHistory::UserId)
                    .col(SearchHistory::SearchedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_search_history_user_searched_at")
                    .table(SearchHistory::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SearchHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SearchHistory {
    Table,
    Id,
    UserId,
    City,
    Country,
    SearchedAt,
}
