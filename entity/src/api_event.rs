use sea_orm::entity::prelude::*;

/// Usage telemetry row written once per API request.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "apievents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_type: String,
    pub user_id: Option<i32>,
    pub action: Option<String>,
    pub query: Option<String>,
    pub meta: Option<Json>,
    pub ip: Option<String>,
    pub ts: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
