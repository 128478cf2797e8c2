use crate::server::{
    data::admin_audit::AdminAuditRepository,
    model::admin_audit::{AuditAction, AuditFilterParam, NewAuditParam},
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

mod get_paginated;

fn audit(admin_id: i32, action: AuditAction, target: i32) -> NewAuditParam {
    NewAuditParam {
        admin_id,
        action,
        target_user_id: Some(target),
        target_email: None,
        meta: None,
        ip: None,
    }
}

fn filter(admin_id: Option<i32>, action: Option<&str>) -> AuditFilterParam {
    AuditFilterParam {
        admin_id,
        action: action.map(str::to_string),
        since: Utc::now() - Duration::days(30),
        page: 1,
        per_page: 50,
    }
}
