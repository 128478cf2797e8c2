use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_uniq(User::Username))
                    .col(string_uniq(User::Email))
                    .col(string(User::PasswordHash))
                    .col(string_null(User::Cccd).unique_key())
                    .col(date_null(User::DateOfBirth))
                    .col(string_null(User::Gender))
                    .col(string_null(User::Address))
                    .col(string_null(User::FullName))
                    .col(string(User::SearchText).default(""))
                    .col(string_null(User::PhoneNumber))
                    .col(boolean(User::IsVerified).default(false))
                    .col(boolean(User::Banned).default(false))
                    .col(string(User::Role).default("user"))
                    .col(string(User::TemperatureUnit).default("celsius"))
                    .col(string(User::Language).default("en"))
                    .col(double_null(User::LastLat))
                    .col(double_null(User::LastLon))
                    .col(string_null(User::LastCity))
                    .col(string_null(User::LastCountry))
                    .col(timestamp_null(User::LastLocationAt))
                    .col(string_null(User::DiscordUserId))
                    .col(string_null(User::DiscordChannelId))
                    .col(boolean(User::DiscordSubscribed).default(false))
                    .col(string_null(User::DiscordNotificationCity))
                    .col(string_null(User::DiscordNotificationTime))
                    .col(timestamp_null(User::DiscordLastNotification))
                    .col(
                        timestamp(User::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp(User::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Scheduler scans subscribed users every minute
        manager
            .create_index(
                Index::create()
                    .name("idx_user_discord_subscribed")
                    .table(User::Table)
                    .col(User::DiscordSubscribed)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_discord_subscribed")
                    .table(User::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Cccd,
    DateOfBirth,
    Gender,
    Address,
    FullName,
    SearchText,
    PhoneNumber,
    IsVerified,
    Banned,
    Role,
    TemperatureUnit,
    Language,
    LastLat,
    LastLon,
    LastCity,
    LastCountry,
    LastLocationAt,
    DiscordUserId,
    DiscordChannelId,
    DiscordSubscribed,
    DiscordNotificationCity,
    DiscordNotificationTime,
    DiscordLastNotification,
    CreatedAt,
    UpdatedAt,
}
