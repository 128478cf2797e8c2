//! Moderation alerts posted through a Discord webhook.

use chrono::Utc;
use dioxus_logger::tracing;
use serenity::{
    all::{Http, Timestamp, Webhook},
    builder::{CreateEmbed, ExecuteWebhook},
};

use crate::server::model::user::User;

/// Builds the embed describing a banned user's login attempt.
pub fn banned_login_embed(user: &User) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("🚫 Banned User Login Attempt")
        .colour(0xFF0000)
        .field("User", format!("{} ({})", user.username, user.email), true)
        .field("User ID", user.id.to_string(), true)
        .field(
            "Time",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            false,
        )
        .timestamp(Timestamp::now());

    if let Some(cccd) = &user.cccd {
        embed = embed.field("CCCD", cccd, true);
    }

    embed
}

/// Posts a banned-login alert to `webhook_url`. Failures are logged only.
pub async fn notify_banned_login(webhook_url: &str, user: &User) {
    let http = Http::new("");

    let result = async {
        let webhook = Webhook::from_url(&http, webhook_url).await?;
        webhook
            .execute(
                &http,
                false,
                ExecuteWebhook::new().embed(banned_login_embed(user)),
            )
            .await?;
        Ok::<(), serenity::Error>(())
    }
    .await;

    match result {
        Ok(()) => tracing::info!(
            "Sent banned user notification to Discord for {}",
            user.username
        ),
        Err(e) => tracing::error!("Error sending Discord webhook notification: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::discord::DiscordLink;
    use crate::server::model::user::{Preferences, Role};

    fn banned_user(cccd: Option<&str>) -> User {
        User {
            id: 9,
            username: "mallory".to_string(),
            email: "mallory@example.com".to_string(),
            password_hash: String::new(),
            cccd: cccd.map(str::to_string),
            date_of_birth: None,
            gender: None,
            address: None,
            full_name: None,
            phone_number: None,
            is_verified: false,
            banned: true,
            role: Role::User,
            preferences: Preferences {
                temperature_unit: "celsius".to_string(),
                language: "en".to_string(),
            },
            last_location: None,
            discord: DiscordLink::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn includes_cccd_field_only_when_present() {
        let without = serde_json::to_value(banned_login_embed(&banned_user(None))).unwrap();
        let with = serde_json::to_value(banned_login_embed(&banned_user(Some("0123")))).unwrap();

        assert_eq!(without["fields"].as_array().unwrap().len(), 3);
        assert_eq!(with["fields"].as_array().unwrap().len(), 4);
        assert_eq!(with["fields"][3]["value"], "0123");
        assert_eq!(with["color"], 0xFF0000);
        assert_eq!(without["fields"][0]["value"], "mallory (mallory@example.com)");
    }
}
