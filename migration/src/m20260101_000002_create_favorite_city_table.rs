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
                    .table(FavoriteCity::Table)
                    .if_not_exists()
                    .col(pk_auto(FavoriteCity::Id))
                    .col(integer(FavoriteCity::UserId))
                    .col(string(FavoriteCity::Name))
                    .col(string(FavoriteCity::Country))
                    .col(double(FavoriteCity::Lat))
                    .col(double(FavoriteCity::Lon))
                    .col(
                        timestamp(FavoriteCity::AddedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_city_user_id")
                            .from(FavoriteCity::Table, FavoriteCity::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .unique()
                            .name("idx_favorite_city_unique")
                            .col(FavoriteCity::UserId)
                            .col(FavoriteCity::Name)
                            .col(FavoriteCity::Country),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FavoriteCity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FavoriteCity {
    #[sea_orm(iden = "favorite_cities")]
    Table,
    Id,
    UserId,
    Name,
    Country,
    Lat,
    Lon,
    AddedAt,
}
