use std::sync::Arc;

use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;
use serenity::{
    all::{ApplicationId, Client, GatewayIntents},
    http::Http,
};

use crate::server::{
    bot::handler::Handler, error::AppError, service::weather::client::WeatherClient,
};

/// Builds the Discord client and returns it together with its HTTP client.
///
/// # Arguments
/// - `token` - Bot token from `DISCORD_TOKEN`
/// - `application_id` - `DISCORD_CLIENT_ID`; serenity reads it from the ready event when absent
/// - `db` - Database connection for the command handlers
/// - `weather` - Weather client shared with the API
///
/// # Returns
/// - `Ok((Client, Arc<Http>))` - Client ready to start and its HTTP handle
/// - `Err(AppError::DiscordErr)` - Client construction failed
pub async fn init_bot(
    token: &str,
    application_id: Option<u64>,
    db: DatabaseConnection,
    weather: WeatherClient,
) -> Result<(Client, Arc<Http>), AppError> {
    let intents = GatewayIntents::GUILDS;

    let mut builder = Client::builder(token, intents).event_handler(Handler::new(db, weather));
    if let Some(id) = application_id {
        builder = builder.application_id(ApplicationId::new(id));
    }
    let client = builder.await?;
    let http = client.http.clone();

    Ok((client, http))
}

/// Runs the gateway connection until shutdown. Call from a spawned task.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
