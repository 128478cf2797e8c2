use crate::{
    client::{
        api::helper::{delete, fetch_json, get, post, serialize_json},
        model::error::ApiError,
    },
    model::admin::{
        AdminStatsDto, AdminUserResponseDto, AuditListDto, BanUserDto, MetricsResponseDto,
        UserListDto,
    },
};

pub async fn get_stats() -> Result<AdminStatsDto, ApiError> {
    fetch_json(|| get("/api/admin/stats")).await
}

pub async fn get_metrics(metric: &str, days: u32) -> Result<MetricsResponseDto, ApiError> {
    let url = format!("/api/admin/metrics?metric={}&days={}", metric, days);
    fetch_json(|| get(&url)).await
}

pub async fn get_users(page: u64, limit: u64, q: &str) -> Result<UserListDto, ApiError> {
    let url = format!(
        "/api/admin/users?page={}&limit={}&q={}",
        page,
        limit,
        q.trim().replace(' ', "%20")
    );
    fetch_json(|| get(&url)).await
}

pub async fn set_banned(id: i32, banned: bool) -> Result<AdminUserResponseDto, ApiError> {
    let url = format!("/api/admin/users/{}/ban", id);
    let body = serialize_json(&BanUserDto {
        action: if banned { "ban" } else { "unban" }.to_string(),
    })?;
    fetch_json(|| post(&url).body(body.clone())).await
}

pub async fn delete_user(id: i32) -> Result<AdminUserResponseDto, ApiError> {
    let url = format!("/api/admin/users/{}", id);
    fetch_json(|| delete(&url)).await
}

pub async fn get_audit_log(page: u64, limit: u64) -> Result<AuditListDto, ApiError> {
    let url = format!("/api/admin/audit?page={}&limit={}", page, limit);
    fetch_json(|| get(&url)).await
}
