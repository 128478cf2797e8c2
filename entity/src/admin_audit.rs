use sea_orm::entity::prelude::*;

/// Moderation action performed by an admin.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "adminaudits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub admin_id: i32,
    pub action: String,
    pub target_user_id: Option<i32>,
    pub target_email: Option<String>,
    pub meta: Option<Json>,
    pub ip: Option<String>,
    pub ts: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
