//! Admin audit log repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::admin_audit::{
    AuditEntry, AuditFilterParam, NewAuditParam, PaginatedAudits,
};

pub struct AdminAuditRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AdminAuditRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Writes an audit row stamped with the current time.
    ///
    /// # Returns
    /// - `Ok(AuditEntry)` - The stored row, with user references unresolved
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, param: NewAuditParam) -> Result<AuditEntry, DbErr> {
        let entity = entity::admin_audit::ActiveModel {
            admin_id: ActiveValue::Set(param.admin_id),
            action: ActiveValue::Set(param.action.as_str().to_string()),
            target_user_id: ActiveValue::Set(param.target_user_id),
            target_email: ActiveValue::Set(param.target_email),
            meta: ActiveValue::Set(param.meta),
            ip: ActiveValue::Set(param.ip),
            ts: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(AuditEntry::from_entity(entity))
    }

    /// Gets audit rows matching the filter, newest first. Pages are one-based.
    ///
    /// User references are left unresolved; the caller fills them in.
    pub async fn get_paginated(&self, filter: AuditFilterParam) -> Result<PaginatedAudits, DbErr> {
        let mut query = entity::prelude::AdminAudit::find()
            .filter(entity::admin_audit::Column::Ts.gte(filter.since));
        if let Some(admin_id) = filter.admin_id {
            query = query.filter(entity::admin_audit::Column::AdminId.eq(admin_id));
        }
        if let Some(action) = filter.action {
            query = query.filter(entity::admin_audit::Column::Action.eq(action));
        }

        let paginator = query
            .order_by_desc(entity::admin_audit::Column::Ts)
            .order_by_desc(entity::admin_audit::Column::Id)
            .paginate(self.db, filter.per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(filter.page.saturating_sub(1)).await?;

        Ok(PaginatedAudits {
            audits: entities.into_iter().map(AuditEntry::from_entity).collect(),
            total,
            page: filter.page,
            per_page: filter.per_page,
        })
    }
}
