//! Admin audit log models.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::admin::{AuditEntryDto, AuditListDto, UserRefDto};

/// Moderation actions recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    EditUser,
    BanUser,
    UnbanUser,
    DeleteUser,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EditUser => "edit_user",
            Self::BanUser => "ban_user",
            Self::UnbanUser => "unban_user",
            Self::DeleteUser => "delete_user",
        }
    }
}

/// Audit row with the admin and target accounts resolved where they still exist.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: i32,
    pub admin_id: i32,
    pub admin: Option<UserRef>,
    pub action: String,
    pub target_user_id: Option<i32>,
    pub target_user: Option<UserRef>,
    pub target_email: Option<String>,
    pub meta: Option<Value>,
    pub ip: Option<String>,
    pub ts: DateTime<Utc>,
}

/// Username and email of a referenced account.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRef {
    pub username: String,
    pub email: String,
}

impl UserRef {
    pub fn into_dto(self) -> UserRefDto {
        UserRefDto {
            username: self.username,
            email: self.email,
        }
    }
}

impl AuditEntry {
    /// Converts an entity, leaving user references unresolved.
    pub fn from_entity(entity: entity::admin_audit::Model) -> Self {
        Self {
            id: entity.id,
            admin_id: entity.admin_id,
            admin: None,
            action: entity.action,
            target_user_id: entity.target_user_id,
            target_user: None,
            target_email: entity.target_email,
            meta: entity.meta,
            ip: entity.ip,
            ts: entity.ts,
        }
    }

    pub fn into_dto(self) -> AuditEntryDto {
        AuditEntryDto {
            id: self.id,
            admin_id: self.admin_id,
            admin: self.admin.map(UserRef::into_dto),
            action: self.action,
            target_user_id: self.target_user_id,
            target_user: self.target_user.map(UserRef::into_dto),
            target_email: self.target_email,
            meta: self.meta,
            ip: self.ip,
            ts: self.ts,
        }
    }
}

/// Parameters for writing an audit row.
#[derive(Debug, Clone)]
pub struct NewAuditParam {
    pub admin_id: i32,
    pub action: AuditAction,
    pub target_user_id: Option<i32>,
    pub target_email: Option<String>,
    pub meta: Option<Value>,
    pub ip: Option<String>,
}

/// Filters for listing the audit log.
#[derive(Debug, Clone)]
pub struct AuditFilterParam {
    pub admin_id: Option<i32>,
    pub action: Option<String>,
    pub since: DateTime<Utc>,
    /// One-based page number.
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedAudits {
    pub audits: Vec<AuditEntry>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl PaginatedAudits {
    pub fn into_dto(self) -> AuditListDto {
        AuditListDto {
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            audits: self.audits.into_iter().map(AuditEntry::into_dto).collect(),
        }
    }
}
