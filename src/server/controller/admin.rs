use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::{
    model::{
        admin::{
            AdminStatsDto, AdminUserDetailDto, AdminUserResponseDto, AuditListDto, BanUserDto,
            MetricsResponseDto, UpdateUserDto, UserAnalyticsDto, UserListDto,
        },
        api::ErrorDto,
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            admin::{metrics_into_dto, parse_days, BanAction, MetricsParam},
            admin_audit::AuditFilterParam,
            user::{UpdateUserParam, UserFilterParam, UserStatusFilter},
        },
        service::admin::AdminService,
        state::AppState,
        util::request::ClientIp,
    },
};

/// Tag for grouping admin endpoints in OpenAPI documentation
pub static ADMIN_TAG: &str = "admin";

const MIN_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;
const MAX_PAGE: i64 = 100_000;
const DEFAULT_AUDIT_DAYS: i64 = 30;

#[derive(Deserialize)]
pub struct MetricsQuery {
    pub metric: Option<String>,
    pub days: Option<String>,
    pub bucket: Option<String>,
}

#[derive(Deserialize)]
pub struct UsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub q: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub admin_id: Option<String>,
    pub action: Option<String>,
    pub days: Option<String>,
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

/// Resolves one-based page and page size, clamping the size to 10..=100.
pub fn page_and_limit(page: Option<&str>, limit: Option<&str>, default_limit: i64) -> (u64, u64) {
    let page = parse_int(page).unwrap_or(1).clamp(1, MAX_PAGE);
    let limit = parse_int(limit)
        .unwrap_or(default_limit)
        .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
    (page as u64, limit as u64)
}

impl UsersQuery {
    fn into_param(self) -> UserFilterParam {
        let (page, per_page) = page_and_limit(self.page.as_deref(), self.limit.as_deref(), 20);
        UserFilterParam {
            q: self
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            status: match self.status.as_deref() {
                Some("banned") => Some(UserStatusFilter::Banned),
                Some("active") => Some(UserStatusFilter::Active),
                _ => None,
            },
            page,
            per_page,
        }
    }
}

impl AuditQuery {
    fn into_param(self) -> Result<AuditFilterParam, AppError> {
        let (page, per_page) = page_and_limit(self.page.as_deref(), self.limit.as_deref(), 50);
        let days = parse_days(self.days.as_deref(), DEFAULT_AUDIT_DAYS)?;
        Ok(AuditFilterParam {
            admin_id: self.admin_id.and_then(|id| id.trim().parse().ok()),
            action: self.action.filter(|a| !a.is_empty()),
            since: Utc::now() - Duration::days(days),
            page,
            per_page,
        })
    }
}

/// Get dashboard statistics.
///
/// Results are cached for 30 seconds; `cached` tells whether this response came
/// from the cache.
///
/// # Access Control
/// - `Admin` - Only admins can view statistics
///
/// # Arguments
/// - `state` - Application state containing the database connection and admin cache
/// - `headers` - Request headers carrying the bearer token
///
/// # Returns
/// - `200 OK` - Aggregate statistics
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an admin
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Dashboard statistics", body = AdminStatsDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[Permission::Admin])
        .await?;

    let (stats, cached) = AdminService::new(&state.db, &state.admin_cache)
        .stats()
        .await?;

    Ok(Json(stats.into_dto(cached)))
}

/// Get a bucketed time series.
///
/// # Access Control
/// - `Admin` - Only admins can view metrics
///
/// # Returns
/// - `200 OK` - Buckets in ascending order, cached for 20 seconds
/// - `400 Bad Request` - `days` outside 1..=365
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an admin
#[utoipa::path(
    get,
    path = "/api/admin/metrics",
    tag = ADMIN_TAG,
    params(
        ("metric" = Option<String>, Query, description = "api_events (default), searches, new_users or discord_notifications"),
        ("days" = Option<i64>, Query, description = "Window in days, 1 to 365 (default: 7)"),
        ("bucket" = Option<String>, Query, description = "day (default) or hour")
    ),
    responses(
        (status = 200, description = "Metric series", body = MetricsResponseDto),
        (status = 400, description = "Invalid days parameter", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MetricsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[Permission::Admin])
        .await?;

    let param = MetricsParam::parse(
        query.metric.as_deref(),
        query.days.as_deref(),
        query.bucket.as_deref(),
    )?;
    let (points, cached) = AdminService::new(&state.db, &state.admin_cache)
        .metrics(param)
        .await?;

    Ok(Json(metrics_into_dto(points, cached)))
}

/// List accounts, newest first.
///
/// # Access Control
/// - `Admin` - Only admins can list users
///
/// # Returns
/// - `200 OK` - One page of users
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an admin
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    params(
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<u64>, Query, description = "Page size, 10 to 100 (default: 20)"),
        ("q" = Option<String>, Query, description = "Substring of username, email or full name"),
        ("status" = Option<String>, Query, description = "banned or active")
    ),
    responses(
        (status = 200, description = "Users", body = UserListDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[Permission::Admin])
        .await?;

    let users = AdminService::new(&state.db, &state.admin_cache)
        .list_users(query.into_param())
        .await?;

    Ok(Json(users.into_dto()))
}

/// Get one account.
///
/// # Access Control
/// - `Admin` - Only admins can view accounts
///
/// # Returns
/// - `200 OK` - The account
/// - `404 Not Found` - No such user
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = ADMIN_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = AdminUserDetailDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[Permission::Admin])
        .await?;

    let user = AdminService::new(&state.db, &state.admin_cache)
        .get_user(id)
        .await?;

    Ok(Json(AdminUserDetailDto {
        user: user.into_admin_dto(),
    }))
}

/// Edit an account. Recorded in the audit log as `edit_user`.
///
/// # Access Control
/// - `Admin` - Only admins can edit accounts
///
/// # Returns
/// - `200 OK` - Updated account
/// - `400 Bad Request` - Validation failed
/// - `404 Not Found` - No such user
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = ADMIN_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = AdminUserResponseDto),
        (status = 400, description = "Validation failed", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[Permission::Admin])
        .await?;

    let param = UpdateUserParam::from_dto(payload)?;
    let user = AdminService::new(&state.db, &state.admin_cache)
        .update_user(&admin, id, param, ip)
        .await?;

    Ok(Json(AdminUserResponseDto {
        message: "User updated".to_string(),
        user: user.into_admin_dto(),
    }))
}

/// Ban or unban an account. Recorded as `ban_user` or `unban_user`.
///
/// # Access Control
/// - `Admin` - Only admins can moderate accounts
///
/// # Returns
/// - `200 OK` - Updated account
/// - `400 Bad Request` - Action is neither `ban` nor `unban`
/// - `404 Not Found` - No such user
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/ban",
    tag = ADMIN_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = BanUserDto,
    responses(
        (status = 200, description = "Ban state changed", body = AdminUserResponseDto),
        (status = 400, description = "Invalid action", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn ban_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
    Json(payload): Json<BanUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[Permission::Admin])
        .await?;

    let action = BanAction::parse(&payload.action)?;
    let user = AdminService::new(&state.db, &state.admin_cache)
        .set_ban(&admin, id, action, ip)
        .await?;

    let message = match action {
        BanAction::Ban => "User banned",
        BanAction::Unban => "User unbanned",
    };

    Ok(Json(AdminUserResponseDto {
        message: message.to_string(),
        user: user.into_admin_dto(),
    }))
}

/// Delete an account with its favorites and search history.
///
/// Recorded as `delete_user` with the deleted email in the audit metadata.
///
/// # Access Control
/// - `Admin` - Only admins can delete accounts
///
/// # Returns
/// - `200 OK` - The deleted account
/// - `404 Not Found` - No such user
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = ADMIN_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = AdminUserResponseDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    ClientIp(ip): ClientIp,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[Permission::Admin])
        .await?;

    let user = AdminService::new(&state.db, &state.admin_cache)
        .delete_user(&admin, id, ip)
        .await?;

    Ok(Json(AdminUserResponseDto {
        message: "User deleted".to_string(),
        user: user.into_admin_dto(),
    }))
}

/// View the moderation log, newest first.
///
/// # Access Control
/// - `Admin` - Only admins can view the audit log
///
/// # Returns
/// - `200 OK` - One page of audit entries
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an admin
#[utoipa::path(
    get,
    path = "/api/admin/audit",
    tag = ADMIN_TAG,
    params(
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<u64>, Query, description = "Page size, 10 to 100 (default: 50)"),
        ("adminId" = Option<i32>, Query, description = "Only actions by this admin"),
        ("action" = Option<String>, Query, description = "Only this action"),
        ("days" = Option<i64>, Query, description = "Look-back window in days, 1 to 365 (default: 30)")
    ),
    responses(
        (status = 200, description = "Audit entries", body = AuditListDto),
        (status = 400, description = "Invalid days parameter", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_audit_log(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[Permission::Admin])
        .await?;

    let audits = AdminService::new(&state.db, &state.admin_cache)
        .audit_log(query.into_param()?)
        .await?;

    Ok(Json(audits.into_dto()))
}

/// Summarize one account's activity.
///
/// # Access Control
/// - `Admin` - Only admins can view analytics
///
/// # Returns
/// - `200 OK` - Event count, searches, favorites and action breakdown
/// - `404 Not Found` - No such user
#[utoipa::path(
    get,
    path = "/api/admin/user-analytics/{user_id}",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User analytics", body = UserAnalyticsDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn get_user_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.config, &headers)
        .require(&[Permission::Admin])
        .await?;

    let analytics = AdminService::new(&state.db, &state.admin_cache)
        .user_analytics(user_id)
        .await?;

    Ok(Json(analytics.into_dto()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_page_size() {
        assert_eq!(page_and_limit(None, None, 20), (1, 20));
        assert_eq!(page_and_limit(Some("0"), Some("5"), 20), (1, 10));
        assert_eq!(page_and_limit(Some("3"), Some("500"), 50), (3, 100));
        assert_eq!(page_and_limit(Some("x"), Some("y"), 50), (1, 50));
    }

    #[test]
    fn builds_user_filter() {
        let param = UsersQuery {
            page: Some("2".to_string()),
            limit: None,
            q: Some("  alice ".to_string()),
            status: Some("banned".to_string()),
        }
        .into_param();

        assert_eq!(param.q.as_deref(), Some("alice"));
        assert_eq!(param.status, Some(UserStatusFilter::Banned));
        assert_eq!((param.page, param.per_page), (2, 20));
    }

    #[test]
    fn builds_audit_filter_with_defaults() {
        let param = AuditQuery {
            page: None,
            limit: None,
            admin_id: Some("7".to_string()),
            action: Some(String::new()),
            days: None,
        }
        .into_param()
        .unwrap();

        assert_eq!(param.admin_id, Some(7));
        assert!(param.action.is_none());
        assert_eq!(param.per_page, 50);
        let expected = Utc::now() - Duration::days(DEFAULT_AUDIT_DAYS);
        assert!((param.since - expected).num_seconds().abs() < 5);
    }

    /// Tests that out-of-range audit windows are refused instead of computed.
    ///
    /// Expected: 400 for zero, huge and non-numeric `days`; 365 accepted
    #[test]
    fn rejects_out_of_range_audit_days() {
        let query = |days: &str| AuditQuery {
            page: None,
            limit: None,
            admin_id: None,
            action: None,
            days: Some(days.to_string()),
        };

        for days in ["0", "1000000000", "-3", "abc"] {
            assert!(matches!(
                query(days).into_param(),
                Err(AppError::BadRequest(_))
            ));
        }
        assert!(query("365").into_param().is_ok());
    }

    #[test]
    fn caps_page_number() {
        let (page, limit) = page_and_limit(Some("9223372036854775807"), Some("100"), 20);
        assert_eq!(page, MAX_PAGE as u64);
        assert!(page.checked_mul(limit).is_some());
    }
}
