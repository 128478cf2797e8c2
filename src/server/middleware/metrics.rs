//! Usage telemetry for API requests.
//!
//! Every request under `/api/` produces one `request` event. The write happens on
//! a spawned task after the request is handed to the next layer, so a slow or
//! failing database never delays the response.

use axum::{
    extract::{Request, State},
    http::{header::USER_AGENT, Method},
    middleware::Next,
    response::Response,
};
use dioxus_logger::tracing;
use serde_json::{json, Map, Value};

use crate::server::{
    data::api_event::ApiEventRepository,
    middleware::auth::bearer_token,
    model::api_event::NewApiEventParam,
    service::auth::verify_token,
    state::AppState,
    util::request::client_ip,
};

/// Groups a request under a higher-level action used by the admin metrics.
///
/// Matching is done on the lowercased path, first match wins.
pub fn derive_action(method: &Method, path: &str) -> Option<&'static str> {
    let p = path.to_lowercase();

    if let Some(rest) = p.strip_prefix("/api/weather/") {
        return [
            ("search", "search"),
            ("current", "weather_current"),
            ("forecast", "weather_forecast"),
            ("geolocation", "weather_geolocation"),
            ("historical", "weather_historical"),
        ]
        .into_iter()
        .find(|(prefix, _)| rest.starts_with(prefix))
        .map(|(_, action)| action);
    }

    if p.starts_with("/api/cccd") {
        return Some(if p.contains("/register") {
            "cccd_register"
        } else {
            "cccd"
        });
    }

    if p.starts_with("/api/user/favorites") {
        if method == Method::POST {
            return Some("add_favorite");
        }
        if method == Method::DELETE || method == Method::PUT {
            return Some("remove_favorite");
        }
    }

    if p.starts_with("/api/user/search-history") && method == Method::POST {
        return Some("user_search_history_add");
    }

    if p.starts_with("/api/auth") {
        return Some(if p.contains("/login") {
            "auth_login"
        } else if p.contains("/register") {
            "auth_register"
        } else if p.contains("/me") {
            "auth_me"
        } else {
            "auth"
        });
    }

    if p.starts_with("/api/discord") && method == Method::POST {
        return Some("discord_event");
    }

    None
}

/// Parses a raw query string into a JSON object, `None` when empty.
fn query_map(raw: Option<&str>) -> Option<Map<String, Value>> {
    let map: Map<String, Value> = url::form_urlencoded::parse(raw?.as_bytes())
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();
    (!map.is_empty()).then_some(map)
}

/// Normalized search term stored in the event's `query` column.
fn search_term(query: Option<&Map<String, Value>>) -> Option<String> {
    query?
        .get("q")?
        .as_str()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty())
}

/// Axum middleware writing an `ApiEvent` for each `/api/` request.
pub async fn record_api_event(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !path.starts_with("/api/") {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let headers = request.headers();
    let action = derive_action(&method, &path);
    let query = query_map(request.uri().query());
    let user_id = bearer_token(headers)
        .and_then(|token| verify_token(token, &state.config.jwt_secret).ok())
        .map(|claims| claims.user_id);
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ip = client_ip(headers, request.extensions());

    let param = NewApiEventParam {
        event_type: "request".to_string(),
        user_id,
        action: action.map(str::to_string),
        query: if action == Some("search") {
            search_term(query.as_ref())
        } else {
            None
        },
        meta: Some(json!({
            "method": method.as_str(),
            "path": path,
            "query": query,
            "userAgent": user_agent,
            "action": action,
        })),
        ip,
    };

    let db = state.db.clone();
    tokio::spawn(async move {
        if let Err(e) = ApiEventRepository::new(&db).create(param).await {
            tracing::warn!("Metrics write failed: {}", e);
        }
    });

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_weather_actions() {
        assert_eq!(
            derive_action(&Method::GET, "/api/weather/search"),
            Some("search")
        );
        assert_eq!(
            derive_action(&Method::GET, "/api/weather/current"),
            Some("weather_current")
        );
        assert_eq!(
            derive_action(&Method::GET, "/api/Weather/Forecast"),
            Some("weather_forecast")
        );
        assert_eq!(derive_action(&Method::GET, "/api/weather/other"), None);
    }

    #[test]
    fn derives_user_actions_by_method() {
        assert_eq!(
            derive_action(&Method::POST, "/api/user/favorites"),
            Some("add_favorite")
        );
        assert_eq!(
            derive_action(&Method::DELETE, "/api/user/favorites/3"),
            Some("remove_favorite")
        );
        assert_eq!(derive_action(&Method::GET, "/api/user/favorites"), None);
        assert_eq!(
            derive_action(&Method::POST, "/api/user/search-history"),
            Some("user_search_history_add")
        );
        assert_eq!(
            derive_action(&Method::DELETE, "/api/user/search-history"),
            None
        );
    }

    #[test]
    fn derives_auth_and_discord_actions() {
        assert_eq!(
            derive_action(&Method::POST, "/api/auth/login/cccd"),
            Some("auth_login")
        );
        assert_eq!(
            derive_action(&Method::POST, "/api/auth/register"),
            Some("auth_register")
        );
        assert_eq!(derive_action(&Method::GET, "/api/auth/me"), Some("auth_me"));
        assert_eq!(
            derive_action(&Method::POST, "/api/cccd/register"),
            Some("cccd_register")
        );
        assert_eq!(
            derive_action(&Method::POST, "/api/discord/subscribe"),
            Some("discord_event")
        );
        assert_eq!(derive_action(&Method::GET, "/api/discord/status"), None);
    }

    #[test]
    fn normalizes_search_term() {
        let query = query_map(Some("q=%20Ha%20Noi%20&units=metric")).unwrap();

        assert_eq!(search_term(Some(&query)), Some("ha noi".to_string()));
        assert_eq!(query["units"], "metric");
        assert!(query_map(Some("")).is_none());
        assert!(search_term(None).is_none());
    }
}
