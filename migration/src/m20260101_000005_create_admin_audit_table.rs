use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign keys: audit rows outlive the users they mention
        manager
            .create_table(
                Table::create()
                    .table(AdminAudit::Table)
                    .if_not_exists()
                    .col(pk_auto(AdminAudit::Id))
                    .col(integer(AdminAudit::AdminId))
                    .col(string(AdminAudit::Action))
                    .col(integer_null(AdminAudit::TargetUserId))
                    .col(string_null(AdminAudit::TargetEmail))
                    .col(json_null(AdminAudit::Meta))
                    .col(string_null(AdminAudit::Ip))
                    .col(
                        timestamp(AdminAudit::Ts)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, cols) in [
            ("idx_admin_audit_ts", vec![AdminAudit::Ts]),
            (
                "idx_admin_audit_admin_ts",
                vec![AdminAudit::AdminId, AdminAudit::Ts],
            ),
            (
                "idx_admin_audit_action_ts",
                vec![AdminAudit::Action, AdminAudit::Ts],
            ),
        ] {
            let mut index = Index::create();
            index.name(name).table(AdminAudit::Table);
            for col in cols {
                index.col(col);
            }
            manager.create_index(index.to_owned()).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminAudit::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AdminAudit {
    #[sea_orm(iden = "adminaudits")]
    Table,
    Id,
    AdminId,
    Action,
    TargetUserId,
    TargetEmail,
    Meta,
    Ip,
    Ts,
}
