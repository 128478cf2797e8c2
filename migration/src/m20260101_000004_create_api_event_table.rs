use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(ApiEvent::Id))
                    .col(string(ApiEvent::EventType))
                    .col(integer_null(ApiEvent::UserId))
                    .col(string_null(ApiEvent::Action))
                    .col(string_null(ApiEvent::Query))
                    .col(json_null(ApiEvent::Meta))
                    .col(string_null(ApiEvent::Ip))
                    .col(
                        timestamp(ApiEvent::Ts)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_api_event_ts")
                    .table(ApiEvent::Table)
                    .col(ApiEvent::Ts)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_api_event_action_ts")
                    .table(ApiEvent::Table)
                    .col(ApiEvent::Action)
                    .col(ApiEvent::Ts)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_api_event_action_ts")
                    .table(ApiEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_api_event_ts")
                    .table(ApiEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ApiEvent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ApiEvent {
    #[sea_orm(iden = "apievents")]
    Table,
    Id,
    EventType,
    UserId,
    Action,
    Query,
    Meta,
    Ip,
    Ts,
}
