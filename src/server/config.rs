use dioxus_logger::tracing;
use url::Url;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_DATABASE_URL: &str = "sqlite://weather.db?mode=rwc";
const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_APP_URL: &str = "http://localhost:8080";
const DEV_JWT_SECRET: &str = "fallback_secret_key_for_development_only";

pub struct Config {
    pub database_url: String,
    pub app_url: String,

    pub jwt_secret: String,
    /// Lowercased emails granted admin access regardless of stored role.
    pub admin_emails: Vec<String>,

    pub weather_api_key: Option<String>,
    pub weather_api_url: String,

    pub discord_token: Option<String>,
    pub discord_client_id: Option<u64>,
    pub discord_webhook_url: Option<String>,

    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = optional("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!(
                "JWT_SECRET not set, using fallback key. This is not secure for production!"
            );
            DEV_JWT_SECRET.to_string()
        });

        let weather_api_key = optional("WEATHER_API_KEY");
        if weather_api_key.is_none() {
            tracing::warn!("WEATHER_API_KEY is not set. Weather requests will fail.");
        }

        let discord_client_id = optional("DISCORD_CLIENT_ID")
            .map(|id| {
                id.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                    name: "DISCORD_CLIENT_ID".to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let admin_emails = optional("ADMIN_EMAILS")
            .or_else(|| optional("ADMIN_EMAIL"))
            .map(|raw| parse_admin_emails(&raw))
            .unwrap_or_default();

        Ok(Self {
            database_url: optional("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            app_url: url_var("APP_URL", DEFAULT_APP_URL)?,
            jwt_secret,
            admin_emails,
            weather_api_key,
            weather_api_url: url_var("WEATHER_API_URL", DEFAULT_WEATHER_API_URL)?,
            discord_token: optional("DISCORD_TOKEN"),
            discord_client_id,
            discord_webhook_url: optional("DISCORD_WEBHOOK_URL"),
            gemini_api_key: optional("GEMINI_API_KEY"),
            gemini_model: optional("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        })
    }
}

/// Reads a variable, treating empty values as unset.
fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reads a URL variable, validating it and stripping any trailing slash.
fn url_var(name: &str, default: &str) -> Result<String, ConfigError> {
    let raw = optional(name).unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// Splits a comma-separated email list into trimmed, lowercased entries.
pub fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
impl Config {
    /// Configuration with every external service disabled.
    pub fn test() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
            jwt_secret: "test-secret".to_string(),
            admin_emails: vec!["admin@example.com".to_string()],
            weather_api_key: None,
            weather_api_url: "http://127.0.0.1:9".to_string(),
            discord_token: None,
            discord_client_id: None,
            discord_webhook_url: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_admin_emails_case_insensitively() {
        let emails = parse_admin_emails(" Admin@Example.com, ,ops@example.com ");

        assert_eq!(emails, vec!["admin@example.com", "ops@example.com"]);
    }
}
